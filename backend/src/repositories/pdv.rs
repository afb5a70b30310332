//! Per-meal percent daily value snapshots

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use nutri_coach_shared::pdv::NutritionFacts;
use nutri_coach_shared::types::PdvSnapshotResponse;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PdvSnapshotRecord {
    pub id: i64,
    pub user_id: i64,
    pub meal: String,
    pub recipe_id: Option<i64>,
    pub calories: f64,
    pub total_fat_pdv: f64,
    pub sugar_pdv: f64,
    pub sodium_pdv: f64,
    pub protein_pdv: f64,
    pub saturated_fat_pdv: f64,
    pub carbohydrates_pdv: f64,
    pub recorded_at: DateTime<Utc>,
}

impl PdvSnapshotRecord {
    pub fn nutrition(&self) -> NutritionFacts {
        NutritionFacts {
            calories: self.calories,
            total_fat_pdv: self.total_fat_pdv,
            sugar_pdv: self.sugar_pdv,
            sodium_pdv: self.sodium_pdv,
            protein_pdv: self.protein_pdv,
            saturated_fat_pdv: self.saturated_fat_pdv,
            carbohydrates_pdv: self.carbohydrates_pdv,
        }
    }
}

impl From<PdvSnapshotRecord> for PdvSnapshotResponse {
    fn from(record: PdvSnapshotRecord) -> Self {
        Self {
            id: record.id,
            nutrition: record.nutrition(),
            meal: record.meal,
            recipe_id: record.recipe_id,
            recorded_at: record.recorded_at,
        }
    }
}

/// Input for recording a snapshot
#[derive(Debug, Clone)]
pub struct CreatePdvSnapshot {
    pub user_id: i64,
    pub meal: String,
    pub recipe_id: Option<i64>,
    pub nutrition: NutritionFacts,
    pub recorded_at: DateTime<Utc>,
}

const SNAPSHOT_COLUMNS: &str = "id, user_id, meal, recipe_id, calories, total_fat_pdv, sugar_pdv, \
                                sodium_pdv, protein_pdv, saturated_fat_pdv, carbohydrates_pdv, recorded_at";

pub struct PdvRepository;

impl PdvRepository {
    pub async fn create(pool: &SqlitePool, input: CreatePdvSnapshot) -> Result<PdvSnapshotRecord> {
        let n = input.nutrition;
        let record = sqlx::query_as::<_, PdvSnapshotRecord>(&format!(
            r#"
            INSERT INTO pdv_snapshots
                (user_id, meal, recipe_id, calories, total_fat_pdv, sugar_pdv, sodium_pdv,
                 protein_pdv, saturated_fat_pdv, carbohydrates_pdv, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {SNAPSHOT_COLUMNS}
            "#
        ))
        .bind(input.user_id)
        .bind(&input.meal)
        .bind(input.recipe_id)
        .bind(n.calories)
        .bind(n.total_fat_pdv)
        .bind(n.sugar_pdv)
        .bind(n.sodium_pdv)
        .bind(n.protein_pdv)
        .bind(n.saturated_fat_pdv)
        .bind(n.carbohydrates_pdv)
        .bind(input.recorded_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// All snapshots, newest first
    pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<PdvSnapshotRecord>> {
        let records = sqlx::query_as::<_, PdvSnapshotRecord>(&format!(
            "SELECT {SNAPSHOT_COLUMNS} FROM pdv_snapshots WHERE user_id = ? ORDER BY recorded_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Snapshots recorded on one UTC day, oldest first
    pub async fn list_on(pool: &SqlitePool, user_id: i64, date: NaiveDate) -> Result<Vec<PdvSnapshotRecord>> {
        let records = sqlx::query_as::<_, PdvSnapshotRecord>(&format!(
            r#"
            SELECT {SNAPSHOT_COLUMNS}
            FROM pdv_snapshots
            WHERE user_id = ? AND substr(recorded_at, 1, 10) = ?
            ORDER BY recorded_at ASC, id ASC
            "#
        ))
        .bind(user_id)
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
