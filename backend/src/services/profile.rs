//! Personal information

use crate::error::ApiError;
use crate::repositories::{UpdateUserProfile, UserRepository};
use nutri_coach_shared::types::{UpdateProfileRequest, UserProfileResponse};
use nutri_coach_shared::validation;
use sqlx::SqlitePool;
use tracing::debug;
use validator::Validate;

pub struct ProfileService;

/// Trimmed value, or `None` when blank
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ProfileService {
    /// Update the fields present in the request; the rest keep their value
    pub async fn update(
        pool: &SqlitePool,
        user_id: i64,
        req: &UpdateProfileRequest,
    ) -> Result<UserProfileResponse, ApiError> {
        req.validate()?;
        if let Some(weight) = req.weight {
            validation::validate_weight(weight).map_err(|msg| ApiError::invalid_field("weight", msg))?;
        }
        if let Some(height) = req.height {
            validation::validate_height_cm(height).map_err(|msg| ApiError::invalid_field("height", msg))?;
        }
        if let Some(age) = req.age {
            validation::validate_age(age).map_err(|msg| ApiError::invalid_field("age", msg))?;
        }

        let update = UpdateUserProfile {
            weight: req.weight,
            height: req.height,
            age: req.age,
            sex: req.sex,
            activity_intensity: req.activity_intensity,
            garmin_id: non_blank(&req.garmin_id),
            garmin_token: non_blank(&req.garmin_token),
        };

        let user = UserRepository::update_profile(pool, user_id, &update)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        debug!(user_id, "Profile updated");
        Ok(user.to_profile())
    }
}
