//! Authentication module
//!
//! JWT bearer tokens, argon2 password hashing with bcrypt legacy support.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenKind};
pub use middleware::AuthUser;
pub use password::PasswordService;
