//! User service for registration, login and token refresh
//!
//! Password hashing and verification run on the blocking thread pool.
//! Accounts still holding a bcrypt hash are moved to argon2 on their next
//! successful login.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{is_unique_violation, UserRepository};
use metrics::counter;
use nutri_coach_shared::types::{AuthTokens, LoginRequest, RegisterRequest, UserProfileResponse};
use nutri_coach_shared::validation;
use sqlx::SqlitePool;
use tracing::{info, warn};
use validator::Validate;

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and sign them in
    pub async fn register(
        pool: &SqlitePool,
        jwt_service: &JwtService,
        req: &RegisterRequest,
    ) -> Result<AuthTokens, ApiError> {
        req.validate()?;
        validation::validate_username(&req.username)
            .map_err(|msg| ApiError::invalid_field("username", msg))?;
        validation::validate_password(&req.password)
            .map_err(|msg| ApiError::invalid_field("password", msg))?;
        validation::validate_password_confirmation(&req.password, &req.confirm_password)
            .map_err(|msg| ApiError::invalid_field("confirm_password", msg))?;

        let password_hash = PasswordService::hash_async(req.password.clone())
            .await
            .map_err(ApiError::Internal)?;

        // The UNIQUE constraint on username is the duplicate check
        let user = UserRepository::create(pool, &req.username, &password_hash)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("Username already taken".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        counter!("nutri_coach_registrations_total").increment(1);
        info!(user_id = user.id, "User registered");

        jwt_service
            .issue_tokens(user.id, Some(&user.username))
            .map_err(ApiError::Internal)
    }

    /// Login with username and password
    pub async fn login(
        pool: &SqlitePool,
        jwt_service: &JwtService,
        req: &LoginRequest,
    ) -> Result<AuthTokens, ApiError> {
        let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

        let Some(user) = UserRepository::find_by_username(pool, &req.username)
            .await
            .map_err(ApiError::Internal)?
        else {
            counter!("nutri_coach_logins_total", "outcome" => "failure").increment(1);
            return Err(invalid());
        };

        let valid = PasswordService::verify_async(req.password.clone(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            counter!("nutri_coach_logins_total", "outcome" => "failure").increment(1);
            return Err(invalid());
        }

        if PasswordService::is_legacy_hash(&user.password_hash) {
            Self::upgrade_legacy_hash(pool, user.id, req.password.clone()).await;
        }

        counter!("nutri_coach_logins_total", "outcome" => "success").increment(1);
        jwt_service
            .issue_tokens(user.id, Some(&user.username))
            .map_err(ApiError::Internal)
    }

    /// Best effort: a failed upgrade leaves the bcrypt hash in place
    async fn upgrade_legacy_hash(pool: &SqlitePool, user_id: i64, password: String) {
        let result = match PasswordService::hash_async(password).await {
            Ok(hash) => UserRepository::update_password_hash(pool, user_id, &hash).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!(user_id, "Upgraded legacy bcrypt hash to argon2"),
            Err(e) => warn!(user_id, error = %e, "Failed to upgrade legacy password hash"),
        }
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh_token(
        pool: &SqlitePool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user_id = jwt_service
            .refresh_token_user_id(refresh_token)
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        jwt_service
            .issue_tokens(user.id, Some(&user.username))
            .map_err(ApiError::Internal)
    }

    /// Current user's profile
    pub async fn get_profile(pool: &SqlitePool, user_id: i64) -> Result<UserProfileResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user.to_profile())
    }
}
