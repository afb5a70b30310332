//! Nutrition coach conversations

use crate::clients::ChatCompletion;
use crate::config::ChatConfig;
use crate::error::ApiError;
use crate::repositories::ChatRepository;
use metrics::counter;
use nutri_coach_shared::models::{ChatRole, ChatTurn};
use nutri_coach_shared::types::{AskRequest, ChatMessageResponse, ChatQuestionsResponse};
use sqlx::SqlitePool;
use tracing::{error, info};
use validator::Validate;

/// Shortcuts offered to the user before they type anything
pub const PREDEFINED_QUESTIONS: [&str; 6] = [
    "What are the best foods for post-workout recovery?",
    "How to balance meals for optimal performance?",
    "Which foods should be avoided before a workout?",
    "What are the best high-protein foods for athletes?",
    "Can you provide me with a workout plan?",
    "How can I improve my endurance effectively?",
];

pub struct ChatService;

impl ChatService {
    pub fn questions() -> ChatQuestionsResponse {
        ChatQuestionsResponse {
            questions: PREDEFINED_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// Store the prompt, replay the conversation to the model and store its answer
    pub async fn ask(
        pool: &SqlitePool,
        client: Option<&dyn ChatCompletion>,
        config: &ChatConfig,
        user_id: i64,
        req: &AskRequest,
    ) -> Result<ChatMessageResponse, ApiError> {
        let client = client.ok_or_else(|| {
            ApiError::Unavailable("The nutrition coach is not configured".to_string())
        })?;

        req.validate()?;
        let prompt = req.prompt.trim();
        if prompt.is_empty() {
            return Err(ApiError::invalid_field("prompt", "Ask a question"));
        }

        ChatRepository::insert(pool, user_id, ChatRole::User, prompt)
            .await
            .map_err(ApiError::Internal)?;

        let history = ChatRepository::history(pool, user_id, config.history_limit)
            .await
            .map_err(ApiError::Internal)?;

        let mut turns = Vec::with_capacity(history.len() + 1);
        turns.push(ChatTurn::new(ChatRole::System, config.system_prompt.as_str()));
        turns.extend(history.iter().map(|m| m.to_turn()));

        let reply = match client.complete(&turns).await {
            Ok(reply) => {
                counter!("nutri_coach_chat_requests_total", "outcome" => "success").increment(1);
                reply
            }
            Err(e) => {
                counter!("nutri_coach_chat_requests_total", "outcome" => "failure").increment(1);
                error!(user_id, error = %e, "Chat completion failed");
                return Err(ApiError::Upstream("An error occurred with the API".to_string()));
            }
        };

        let stored = ChatRepository::insert(pool, user_id, ChatRole::Assistant, &reply)
            .await
            .map_err(ApiError::Internal)?;

        info!(user_id, turns = turns.len(), "Chat answered");
        Ok(stored.into())
    }

    pub async fn history(
        pool: &SqlitePool,
        config: &ChatConfig,
        user_id: i64,
    ) -> Result<Vec<ChatMessageResponse>, ApiError> {
        let records = ChatRepository::history(pool, user_id, config.history_limit)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Forget the conversation; returns the number of deleted messages
    pub async fn clear(pool: &SqlitePool, user_id: i64) -> Result<u64, ApiError> {
        ChatRepository::clear(pool, user_id)
            .await
            .map_err(ApiError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ClientError;
    use crate::db;
    use crate::repositories::UserRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers with the number of turns it received and remembers them
    #[derive(Default)]
    struct CountingChat {
        seen: Mutex<Vec<ChatTurn>>,
    }

    #[async_trait]
    impl ChatCompletion for CountingChat {
        async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ClientError> {
            *self.seen.lock().unwrap() = turns.to_vec();
            Ok(format!("{} turns", turns.len()))
        }
    }

    struct DownChat;

    #[async_trait]
    impl ChatCompletion for DownChat {
        async fn complete(&self, _turns: &[ChatTurn]) -> Result<String, ClientError> {
            Err(ClientError::Status {
                status: 500,
                body: "oops".to_string(),
            })
        }
    }

    async fn setup() -> (SqlitePool, i64) {
        let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let user = UserRepository::create(&pool, "athlete", "hash").await.unwrap();
        (pool, user.id)
    }

    fn ask(prompt: &str) -> AskRequest {
        AskRequest {
            prompt: prompt.to_string(),
        }
    }

    #[tokio::test]
    async fn test_ask_replays_history_after_system_prompt() {
        let (pool, user_id) = setup().await;
        let chat = CountingChat::default();
        let config = ChatConfig::default();

        let first = ChatService::ask(&pool, Some(&chat), &config, user_id, &ask(PREDEFINED_QUESTIONS[0]))
            .await
            .unwrap();
        assert_eq!(first.role, ChatRole::Assistant);
        assert_eq!(first.content, "2 turns");

        let second = ChatService::ask(&pool, Some(&chat), &config, user_id, &ask("And before?"))
            .await
            .unwrap();
        assert_eq!(second.content, "4 turns");

        let seen = chat.seen.lock().unwrap().clone();
        assert_eq!(seen[0], ChatTurn::new(ChatRole::System, "You are a helpful assistant."));
        assert_eq!(seen[3], ChatTurn::new(ChatRole::User, "And before?"));

        let history = ChatService::history(&pool, &config, user_id).await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(ChatService::clear(&pool, user_id).await.unwrap(), 4);
        assert!(ChatService::history(&pool, &config, user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ask_without_client_is_unavailable() {
        let (pool, user_id) = setup().await;
        let err = ChatService::ask(&pool, None, &ChatConfig::default(), user_id, &ask("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_failed_completion_keeps_the_question() {
        let (pool, user_id) = setup().await;
        let config = ChatConfig::default();
        let err = ChatService::ask(&pool, Some(&DownChat), &config, user_id, &ask("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));

        let history = ChatService::history(&pool, &config, user_id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::User);
    }

    #[test]
    fn test_predefined_questions() {
        let questions = ChatService::questions().questions;
        assert_eq!(questions.len(), 6);
        assert!(questions.iter().all(|q| q.ends_with('?')));
    }
}
