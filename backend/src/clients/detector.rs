//! Zero-shot image classification client for fridge pictures
//!
//! Posts the base64-encoded image with the candidate labels to an
//! inference endpoint and reads back one score per label.

use super::{ensure_success, ClientError, IngredientDetector};
use crate::config::DetectorConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use nutri_coach_shared::types::LabelScore;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: String,
    parameters: ClassificationParameters<'a>,
}

#[derive(Debug, Serialize)]
struct ClassificationParameters<'a> {
    candidate_labels: &'a [String],
}

pub struct ZeroShotDetector {
    http: Client,
    url: String,
    api_token: Option<SecretString>,
}

impl ZeroShotDetector {
    pub fn new(config: &DetectorConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: super::build_http_client(config.timeout_secs)?,
            url: config.url.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl IngredientDetector for ZeroShotDetector {
    #[instrument(skip(self, image, labels), fields(image_bytes = image.len(), labels = labels.len()))]
    async fn classify(&self, image: &[u8], labels: &[String]) -> Result<Vec<LabelScore>, ClientError> {
        let request = ClassificationRequest {
            inputs: STANDARD.encode(image),
            parameters: ClassificationParameters {
                candidate_labels: labels,
            },
        };

        let mut builder = self.http.post(&self.url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let body = ensure_success(builder.send().await?).await?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))
    }
}
