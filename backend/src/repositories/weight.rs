//! Weight history repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use nutri_coach_shared::types::WeightLogResponse;
use sqlx::SqlitePool;

/// Weight log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightLogRecord {
    pub id: i64,
    pub user_id: i64,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

impl From<WeightLogRecord> for WeightLogResponse {
    fn from(record: WeightLogRecord) -> Self {
        Self {
            id: record.id,
            weight_kg: record.weight_kg,
            recorded_at: record.recorded_at,
        }
    }
}

pub struct WeightRepository;

impl WeightRepository {
    /// Insert a weight log and make it the profile weight
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        weight_kg: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<WeightLogRecord> {
        let mut tx = pool.begin().await?;

        let record = sqlx::query_as::<_, WeightLogRecord>(
            r#"
            INSERT INTO weight_logs (user_id, weight_kg, recorded_at)
            VALUES (?, ?, ?)
            RETURNING id, user_id, weight_kg, recorded_at
            "#,
        )
        .bind(user_id)
        .bind(weight_kg)
        .bind(recorded_at)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET weight = ?, updated_at = ? WHERE id = ?")
            .bind(weight_kg)
            .bind(Utc::now())
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Weight history newest first; `None` returns all of it
    pub async fn list(pool: &SqlitePool, user_id: i64, limit: Option<i64>) -> Result<Vec<WeightLogRecord>> {
        let records = sqlx::query_as::<_, WeightLogRecord>(
            r#"
            SELECT id, user_id, weight_kg, recorded_at
            FROM weight_logs
            WHERE user_id = ?
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
