//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and external systems.

pub mod activity;
pub mod chat;
pub mod dashboard;
pub mod fridge;
pub mod pdv;
pub mod profile;
pub mod recipes;
pub mod user;
pub mod weight;

pub use activity::ActivityService;
pub use chat::{ChatService, PREDEFINED_QUESTIONS};
pub use dashboard::DashboardService;
pub use fridge::FridgeService;
pub use pdv::PdvService;
pub use profile::ProfileService;
pub use recipes::RecipeService;
pub use user::UserService;
pub use weight::WeightService;
