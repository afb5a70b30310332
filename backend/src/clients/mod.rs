//! Outbound HTTP clients
//!
//! Every third-party service is consumed through a trait so handlers can be
//! exercised against in-process stubs. The reqwest implementations live in
//! the submodules.

use async_trait::async_trait;
use nutri_coach_shared::models::ChatTurn;
use nutri_coach_shared::types::LabelScore;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

pub mod chat;
pub mod detector;
pub mod food_com;
pub mod garmin;

pub use chat::OpenAiChatClient;
pub use detector::ZeroShotDetector;
pub use food_com::FoodComImageLookup;
pub use garmin::GarminClient;

/// Failure talking to a third-party API
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Credentials stored on the profile for the fitness import
#[derive(Debug, Clone)]
pub struct GarminCredentials {
    pub garmin_id: String,
    pub token: SecretString,
}

/// One fitness activity as reported by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedActivity {
    pub external_id: i64,
    pub activity_name: Option<String>,
    /// Local start time exactly as the provider formats it
    pub start_time: String,
    pub calories: Option<f64>,
    pub bmr_calories: Option<f64>,
    pub steps: Option<i64>,
}

#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Most recent activities of the configured type, newest first
    async fn recent_activities(
        &self,
        credentials: &GarminCredentials,
        limit: u32,
    ) -> Result<Vec<ImportedActivity>, ClientError>;
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send the conversation and return the assistant's reply
    async fn complete(&self, messages: &[ChatTurn]) -> Result<String, ClientError>;
}

#[async_trait]
pub trait IngredientDetector: Send + Sync {
    /// Probability of each candidate label for the image
    async fn classify(&self, image: &[u8], labels: &[String]) -> Result<Vec<LabelScore>, ClientError>;
}

#[async_trait]
pub trait RecipeImageLookup: Send + Sync {
    /// Image URL of a recipe, `None` when the page has none
    async fn image_url(&self, recipe_id: i64, recipe_name: &str) -> Result<Option<String>, ClientError>;
}

/// Shared reqwest client settings
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("nutri-coach/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Turn a non-2xx response into `ClientError::Status`
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body: body.chars().take(500).collect(),
    })
}

pub(crate) fn trim_base(url: &str) -> &str {
    url.trim_end_matches('/')
}
