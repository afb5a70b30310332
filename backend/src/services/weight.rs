//! Weight history service

use crate::error::ApiError;
use crate::repositories::WeightRepository;
use chrono::Utc;
use nutri_coach_shared::types::{LogWeightRequest, WeightLogResponse};
use nutri_coach_shared::validation;
use sqlx::SqlitePool;
use validator::Validate;

pub struct WeightService;

impl WeightService {
    /// Log a weight; it also becomes the profile weight
    pub async fn log_weight(
        pool: &SqlitePool,
        user_id: i64,
        req: &LogWeightRequest,
    ) -> Result<WeightLogResponse, ApiError> {
        req.validate()?;
        validation::validate_weight(req.weight_kg)
            .map_err(|msg| ApiError::invalid_field("weight_kg", msg))?;

        let recorded_at = req.recorded_at.unwrap_or_else(Utc::now);
        let record = WeightRepository::create(pool, user_id, req.weight_kg, recorded_at)
            .await
            .map_err(ApiError::Internal)?;

        Ok(record.into())
    }

    /// Weight history, newest first
    pub async fn history(
        pool: &SqlitePool,
        user_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<WeightLogResponse>, ApiError> {
        let records = WeightRepository::list(pool, user_id, limit)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }
}
