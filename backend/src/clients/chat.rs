//! OpenAI-compatible chat completion client

use super::{ensure_success, trim_base, ChatCompletion, ClientError};
use crate::config::ChatConfig;
use async_trait::async_trait;
use nutri_coach_shared::models::ChatTurn;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiChatClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiChatClient {
    /// Build the client, or `None` when no API key is configured
    pub fn from_config(config: &ChatConfig) -> Result<Option<Self>, ClientError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        Ok(Some(Self {
            http: super::build_http_client(config.timeout_secs)?,
            base_url: trim_base(&config.base_url).to_string(),
            api_key,
            model: config.model.clone(),
        }))
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    #[instrument(skip(self, messages), fields(model = %self.model, turns = messages.len()))]
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, ClientError> {
        let request = CompletionRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|turn| WireMessage {
                    role: turn.role.as_str(),
                    content: &turn.content,
                })
                .collect(),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let body = ensure_success(response).await?.bytes().await?;
        let completion: CompletionResponse =
            serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClientError::Malformed("completion has no content".to_string()))?;

        debug!(reply_len = reply.len(), "Chat completion received");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutri_coach_shared::models::ChatRole;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ChatConfig {
        ChatConfig {
            base_url: server.uri(),
            api_key: Some(SecretString::new("sk-test".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_api_key_means_no_client() {
        let client = OpenAiChatClient::from_config(&ChatConfig::default()).unwrap();
        assert!(client.is_none());
    }

    #[tokio::test]
    async fn test_sends_conversation_and_returns_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "You are a helpful assistant."},
                    {"role": "user", "content": "What should I eat after a run?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-1",
                "model": "gpt-3.5-turbo",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "Protein and carbs."}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiChatClient::from_config(&config_for(&server)).unwrap().unwrap();
        let reply = client
            .complete(&[
                ChatTurn::new(ChatRole::System, "You are a helpful assistant."),
                ChatTurn::new(ChatRole::User, "What should I eat after a run?"),
            ])
            .await
            .unwrap();

        assert_eq!(reply, "Protein and carbs.");
    }

    #[tokio::test]
    async fn test_empty_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::from_config(&config_for(&server)).unwrap().unwrap();
        let err = client
            .complete(&[ChatTurn::new(ChatRole::User, "hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let client = OpenAiChatClient::from_config(&config_for(&server)).unwrap().unwrap();
        let err = client
            .complete(&[ChatTurn::new(ChatRole::User, "hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 429, .. }));
    }
}
