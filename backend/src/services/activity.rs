//! Fitness activity import and burned-calorie lookup

use crate::clients::{ActivitySource, GarminCredentials};
use crate::config::GarminConfig;
use crate::error::ApiError;
use crate::repositories::{ActivityRepository, UserRepository};
use chrono::NaiveDate;
use metrics::counter;
use nutri_coach_shared::energy::DEFAULT_BURNED_CALORIES;
use nutri_coach_shared::types::{ActivityResponse, DailyBurnedResponse, ImportActivitiesResponse};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tracing::{error, info};

pub struct ActivityService;

impl ActivityService {
    /// Fetch the latest activities and store the ones not seen before
    pub async fn import(
        pool: &SqlitePool,
        source: &dyn ActivitySource,
        config: &GarminConfig,
        user_id: i64,
    ) -> Result<ImportActivitiesResponse, ApiError> {
        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        let credentials = match (user.garmin_id.clone(), user.garmin_token.clone()) {
            (Some(garmin_id), Some(token)) if user.has_garmin_credentials() => GarminCredentials {
                garmin_id,
                token: SecretString::new(token),
            },
            _ => return Err(ApiError::BadRequest("Garmin ID or password not found".to_string())),
        };

        let activities = source
            .recent_activities(&credentials, config.activity_limit)
            .await
            .map_err(|e| {
                error!(user_id, error = %e, "Activity import failed");
                ApiError::Upstream("An error occurred with the API".to_string())
            })?;

        let mut imported = 0;
        for activity in &activities {
            if ActivityRepository::insert_if_absent(pool, user_id, activity)
                .await
                .map_err(ApiError::Internal)?
            {
                imported += 1;
            }
        }

        counter!("nutri_coach_activities_imported_total").increment(imported as u64);
        info!(user_id, fetched = activities.len(), imported, "Activities imported");

        Ok(ImportActivitiesResponse {
            fetched: activities.len(),
            imported,
            skipped: activities.len() - imported,
        })
    }

    pub async fn list(
        pool: &SqlitePool,
        user_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityResponse>, ApiError> {
        let records = ActivityRepository::list(pool, user_id, limit)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Calories burned on `date`, or the default when no activity was recorded
    pub async fn burned_on(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<DailyBurnedResponse, ApiError> {
        let totals = ActivityRepository::calories_on(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?;

        let response = if totals.activity_count > 0 {
            DailyBurnedResponse {
                date,
                calories: totals.calories.unwrap_or(0.0),
                from_activities: true,
            }
        } else {
            DailyBurnedResponse {
                date,
                calories: DEFAULT_BURNED_CALORIES,
                from_activities: false,
            }
        };

        Ok(response)
    }
}
