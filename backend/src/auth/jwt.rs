//! JWT token generation and validation
//!
//! Access and refresh tokens are signed with HS256 from keys derived once
//! at startup and shared behind `Arc`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use nutri_coach_shared::types::AuthTokens;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Kind of a token, carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (numeric user ID)
    pub sub: String,
    /// Username at issue time, for log correlation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub token_type: TokenKind,
}

impl Claims {
    /// Parse the subject back into a user ID
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}

#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
}

impl JwtService {
    /// Derive the keys from the secret. Call once at startup.
    pub fn new(secret: &str, access_token_expiry_secs: i64, refresh_token_expiry_secs: i64) -> Self {
        Self {
            keys: JwtKeys {
                encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
                decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            },
            access_token_expiry_secs,
            refresh_token_expiry_secs,
        }
    }

    /// Issue an access and refresh token pair
    pub fn issue_tokens(&self, user_id: i64, username: Option<&str>) -> Result<AuthTokens> {
        Ok(AuthTokens {
            access_token: self.generate_token(user_id, username, TokenKind::Access)?,
            refresh_token: self.generate_token(user_id, username, TokenKind::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry_secs,
        })
    }

    #[inline]
    pub fn generate_access_token(&self, user_id: i64) -> Result<String> {
        self.generate_token(user_id, None, TokenKind::Access)
    }

    #[inline]
    pub fn generate_refresh_token(&self, user_id: i64) -> Result<String> {
        self.generate_token(user_id, None, TokenKind::Refresh)
    }

    fn generate_token(&self, user_id: i64, username: Option<&str>, kind: TokenKind) -> Result<String> {
        let expiry_secs = match kind {
            TokenKind::Access => self.access_token_expiry_secs,
            TokenKind::Refresh => self.refresh_token_expiry_secs,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            name: username.map(str::to_string),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            token_type: kind,
        };

        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate {:?} token: {}", kind, e))
    }

    /// Validate signature and expiry, then check the token kind
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?
            .claims;

        if claims.token_type != expected {
            anyhow::bail!("Expected a {:?} token", expected);
        }
        Ok(claims)
    }

    /// Validate an access token and return the user ID it was issued for
    pub fn access_token_user_id(&self, token: &str) -> Result<i64> {
        self.validate(token, TokenKind::Access)?.user_id()
    }

    /// Validate a refresh token and return the user ID it was issued for
    pub fn refresh_token_user_id(&self, token: &str) -> Result<i64> {
        self.validate(token, TokenKind::Refresh)?.user_id()
    }

    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test-secret", 3600, 604800)
    }

    #[test]
    fn test_issue_and_validate_pair() {
        let service = create_test_service();
        let tokens = service.issue_tokens(42, Some("alice")).unwrap();

        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);
        assert_eq!(service.access_token_user_id(&tokens.access_token).unwrap(), 42);
        assert_eq!(service.refresh_token_user_id(&tokens.refresh_token).unwrap(), 42);

        let claims = service.validate(&tokens.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let service = create_test_service();
        let access = service.generate_access_token(1).unwrap();
        let refresh = service.generate_refresh_token(1).unwrap();

        assert!(service.refresh_token_user_id(&access).is_err());
        assert!(service.access_token_user_id(&refresh).is_err());
    }

    #[test]
    fn test_invalid_and_foreign_tokens_rejected() {
        let service = create_test_service();
        assert!(service.validate("invalid.token.here", TokenKind::Access).is_err());

        let other = JwtService::new("another-secret", 3600, 604800);
        let token = other.generate_access_token(1).unwrap();
        assert!(service.access_token_user_id(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Beyond the default 60 s leeway
        let service = JwtService::new("test-secret", -120, -120);
        let token = service.generate_access_token(1).unwrap();
        assert!(service.access_token_user_id(&token).is_err());
    }

    #[test]
    fn test_claims_user_id_parses_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            name: None,
            exp: 0,
            iat: 0,
            token_type: TokenKind::Access,
        };
        assert!(claims.user_id().is_err());
    }
}
