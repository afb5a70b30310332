//! Imported fitness activities

use crate::clients::ImportedActivity;
use anyhow::Result;
use chrono::NaiveDate;
use nutri_coach_shared::types::ActivityResponse;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRecord {
    pub id: i64,
    pub user_id: i64,
    pub external_id: i64,
    pub activity_name: Option<String>,
    pub start_time: String,
    pub calories: Option<f64>,
    pub bmr_calories: Option<f64>,
    pub steps: Option<i64>,
}

impl From<ActivityRecord> for ActivityResponse {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id,
            external_id: record.external_id,
            activity_name: record.activity_name,
            start_time: record.start_time,
            calories: record.calories,
            bmr_calories: record.bmr_calories,
            steps: record.steps,
        }
    }
}

/// Calories burned on one day
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct DailyCalories {
    pub activity_count: i64,
    pub calories: Option<f64>,
}

pub struct ActivityRepository;

impl ActivityRepository {
    /// Store an activity unless the same external id is already stored.
    /// Returns whether a row was inserted.
    pub async fn insert_if_absent(
        pool: &SqlitePool,
        user_id: i64,
        activity: &ImportedActivity,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO activities
                (user_id, external_id, activity_name, start_time, calories, bmr_calories, steps)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(activity.external_id)
        .bind(&activity.activity_name)
        .bind(&activity.start_time)
        .bind(activity.calories)
        .bind(activity.bmr_calories)
        .bind(activity.steps)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Activities newest first; `None` returns all of them
    pub async fn list(pool: &SqlitePool, user_id: i64, limit: Option<i64>) -> Result<Vec<ActivityRecord>> {
        let records = sqlx::query_as::<_, ActivityRecord>(
            r#"
            SELECT id, user_id, external_id, activity_name, start_time, calories, bmr_calories, steps
            FROM activities
            WHERE user_id = ?
            ORDER BY start_time DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Sum of the calories of activities started on `date` (local time)
    pub async fn calories_on(pool: &SqlitePool, user_id: i64, date: NaiveDate) -> Result<DailyCalories> {
        let totals = sqlx::query_as::<_, DailyCalories>(
            r#"
            SELECT COUNT(*) AS activity_count, SUM(calories) AS calories
            FROM activities
            WHERE user_id = ? AND substr(start_time, 1, 10) = ?
            "#,
        )
        .bind(user_id)
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_one(pool)
        .await?;

        Ok(totals)
    }
}
