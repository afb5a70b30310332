//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use nutri_coach_shared::energy::{ActivityIntensity, EnergyProfile, Sex};
use nutri_coach_shared::types::UserProfileResponse;
use sqlx::SqlitePool;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<i32>,
    pub sex: Option<String>,
    pub activity_intensity: Option<String>,
    pub garmin_id: Option<String>,
    pub garmin_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn sex(&self) -> Option<Sex> {
        self.sex.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn activity_intensity(&self) -> Option<ActivityIntensity> {
        self.activity_intensity.as_deref().and_then(|s| s.parse().ok())
    }

    /// Stored figures with the documented defaults filled in
    pub fn energy_profile(&self) -> EnergyProfile {
        EnergyProfile::from_optional(
            self.weight,
            self.height,
            self.age,
            self.sex(),
            self.activity_intensity(),
        )
    }

    pub fn has_garmin_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.garmin_id) && present(&self.garmin_token)
    }

    /// Public view; the password hash and Garmin token never leave the server
    pub fn to_profile(&self) -> UserProfileResponse {
        UserProfileResponse {
            id: self.id,
            username: self.username.clone(),
            weight: self.weight,
            height: self.height,
            age: self.age,
            sex: self.sex(),
            activity_intensity: self.activity_intensity(),
            garmin_id: self.garmin_id.clone(),
            has_garmin_credentials: self.has_garmin_credentials(),
            created_at: self.created_at,
        }
    }
}

/// Personal information update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateUserProfile {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub age: Option<i32>,
    pub sex: Option<Sex>,
    pub activity_intensity: Option<ActivityIntensity>,
    pub garmin_id: Option<String>,
    pub garmin_token: Option<String>,
}

const USER_COLUMNS: &str = "id, username, password_hash, weight, height, age, sex, activity_intensity, \
                            garmin_id, garmin_token, created_at, updated_at";

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a user. Fails with a unique violation when the name is taken.
    pub async fn create(pool: &SqlitePool, username: &str, password_hash: &str) -> Result<UserRecord> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Apply a partial profile update and return the updated row
    pub async fn update_profile(
        pool: &SqlitePool,
        id: i64,
        update: &UpdateUserProfile,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                weight = COALESCE(?, weight),
                height = COALESCE(?, height),
                age = COALESCE(?, age),
                sex = COALESCE(?, sex),
                activity_intensity = COALESCE(?, activity_intensity),
                garmin_id = COALESCE(?, garmin_id),
                garmin_token = COALESCE(?, garmin_token),
                updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.weight)
        .bind(update.height)
        .bind(update.age)
        .bind(update.sex.map(|s| s.as_str()))
        .bind(update.activity_intensity.map(|i| i.as_str()))
        .bind(&update.garmin_id)
        .bind(&update.garmin_token)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replace the password hash, used when upgrading legacy hashes
    pub async fn update_password_hash(pool: &SqlitePool, id: i64, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
