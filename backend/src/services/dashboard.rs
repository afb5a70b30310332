//! Dashboard and database viewer payloads

use crate::error::ApiError;
use crate::repositories::{PdvRepository, UserRecord, UserRepository};
use crate::services::{ActivityService, FridgeService, PdvService, WeightService};
use chrono::Utc;
use nutri_coach_shared::energy::energy_needs;
use nutri_coach_shared::types::{DashboardResponse, DatabaseDump};
use sqlx::SqlitePool;

/// Activities shown on the dashboard
const RECENT_ACTIVITIES: i64 = 10;

pub struct DashboardService;

impl DashboardService {
    async fn user(pool: &SqlitePool, user_id: i64) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn overview(pool: &SqlitePool, user_id: i64) -> Result<DashboardResponse, ApiError> {
        let user = Self::user(pool, user_id).await?;
        let today = Utc::now().date_naive();

        let burned_today = ActivityService::burned_on(pool, user_id, today).await?;
        let energy = energy_needs(&user.energy_profile(), burned_today.calories);

        Ok(DashboardResponse {
            profile: user.to_profile(),
            energy,
            burned_today,
            recent_activities: ActivityService::list(pool, user_id, Some(RECENT_ACTIVITIES)).await?,
            weight_history: WeightService::history(pool, user_id, None).await?,
            pdv_today: PdvService::daily_summary(pool, user_id, today).await?,
            fridge: FridgeService::get(pool, user_id).await?.ingredients,
        })
    }

    /// Every row the current user owns, secrets excluded
    pub async fn database(pool: &SqlitePool, user_id: i64) -> Result<DatabaseDump, ApiError> {
        let user = Self::user(pool, user_id).await?;
        let pdv = PdvRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(DatabaseDump {
            users: vec![user.to_profile()],
            activities: ActivityService::list(pool, user_id, None).await?,
            weights: WeightService::history(pool, user_id, None).await?,
            pdv: pdv.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use nutri_coach_shared::types::LogWeightRequest;

    #[tokio::test]
    async fn test_overview_for_new_user() {
        let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let user = UserRepository::create(&pool, "newbie", "hash").await.unwrap();

        let dashboard = DashboardService::overview(&pool, user.id).await.unwrap();
        assert_eq!(dashboard.profile.username, "newbie");
        assert!(!dashboard.burned_today.from_activities);
        assert_eq!(dashboard.energy.burned_calories, 300.0);
        assert!(dashboard.recent_activities.is_empty());
        assert_eq!(dashboard.pdv_today.meal_count, 0);
        assert!(dashboard.fridge.is_empty());
    }

    #[tokio::test]
    async fn test_database_dump_uses_logged_weight() {
        let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let user = UserRepository::create(&pool, "lifter", "hash").await.unwrap();
        WeightService::log_weight(
            &pool,
            user.id,
            &LogWeightRequest {
                weight_kg: 82.5,
                recorded_at: None,
            },
        )
        .await
        .unwrap();

        let dump = DashboardService::database(&pool, user.id).await.unwrap();
        assert_eq!(dump.users.len(), 1);
        assert_eq!(dump.users[0].weight, Some(82.5));
        assert_eq!(dump.weights.len(), 1);
        assert!(dump.activities.is_empty());
        assert!(dump.pdv.is_empty());

        let missing = DashboardService::database(&pool, user.id + 1).await.unwrap_err();
        assert!(matches!(missing, ApiError::NotFound(_)));
    }
}
