//! Chat history with the nutrition coach

use anyhow::Result;
use chrono::{DateTime, Utc};
use nutri_coach_shared::models::{ChatRole, ChatTurn};
use nutri_coach_shared::types::ChatMessageResponse;
use sqlx::SqlitePool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatMessageRecord {
    pub id: i64,
    pub user_id: i64,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageRecord {
    /// Unknown roles read back as user messages
    pub fn role(&self) -> ChatRole {
        self.role.parse().unwrap_or(ChatRole::User)
    }

    pub fn to_turn(&self) -> ChatTurn {
        ChatTurn::new(self.role(), self.content.clone())
    }
}

impl From<ChatMessageRecord> for ChatMessageResponse {
    fn from(record: ChatMessageRecord) -> Self {
        Self {
            id: record.id,
            role: record.role(),
            content: record.content,
            created_at: record.created_at,
        }
    }
}

pub struct ChatRepository;

impl ChatRepository {
    pub async fn insert(
        pool: &SqlitePool,
        user_id: i64,
        role: ChatRole,
        content: &str,
    ) -> Result<ChatMessageRecord> {
        let record = sqlx::query_as::<_, ChatMessageRecord>(
            r#"
            INSERT INTO chat_messages (user_id, role, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, role, content, created_at
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .bind(content)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// The latest `limit` messages in chronological order
    pub async fn history(pool: &SqlitePool, user_id: i64, limit: i64) -> Result<Vec<ChatMessageRecord>> {
        let records = sqlx::query_as::<_, ChatMessageRecord>(
            r#"
            SELECT id, user_id, role, content, created_at FROM (
                SELECT id, user_id, role, content, created_at
                FROM chat_messages
                WHERE user_id = ?
                ORDER BY id DESC
                LIMIT ?
            )
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Delete the whole conversation, returning the number of messages removed
    pub async fn clear(pool: &SqlitePool, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
