//! Garmin Connect activity list client

use super::{ensure_success, trim_base, ActivitySource, ClientError, GarminCredentials, ImportedActivity};
use crate::config::GarminConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GarminActivity {
    activity_id: i64,
    activity_name: Option<String>,
    start_time_local: String,
    activity_type: Option<GarminActivityType>,
    calories: Option<f64>,
    bmr_calories: Option<f64>,
    steps: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GarminActivityType {
    type_key: String,
}

impl From<GarminActivity> for ImportedActivity {
    fn from(activity: GarminActivity) -> Self {
        Self {
            external_id: activity.activity_id,
            activity_name: activity.activity_name,
            start_time: activity.start_time_local,
            calories: activity.calories,
            bmr_calories: activity.bmr_calories,
            steps: activity.steps,
        }
    }
}

pub struct GarminClient {
    http: Client,
    base_url: String,
    activity_type: String,
}

impl GarminClient {
    pub fn new(config: &GarminConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: super::build_http_client(config.timeout_secs)?,
            base_url: trim_base(&config.base_url).to_string(),
            activity_type: config.activity_type.clone(),
        })
    }
}

#[async_trait]
impl ActivitySource for GarminClient {
    #[instrument(skip(self, credentials), fields(garmin_id = %credentials.garmin_id))]
    async fn recent_activities(
        &self,
        credentials: &GarminCredentials,
        limit: u32,
    ) -> Result<Vec<ImportedActivity>, ClientError> {
        let url = format!(
            "{}/activitylist-service/activities/search/activities",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .query(&[("start", 0u32), ("limit", limit)])
            .bearer_auth(credentials.token.expose_secret())
            .send()
            .await?;

        let body = ensure_success(response).await?.bytes().await?;
        let activities: Vec<GarminActivity> =
            serde_json::from_slice(&body).map_err(|e| ClientError::Malformed(e.to_string()))?;
        let fetched = activities.len();

        let kept: Vec<ImportedActivity> = activities
            .into_iter()
            .filter(|a| {
                a.activity_type
                    .as_ref()
                    .is_some_and(|t| t.type_key == self.activity_type)
            })
            .map(ImportedActivity::from)
            .collect();

        debug!(fetched, kept = kept.len(), "Fetched Garmin activities");
        Ok(kept)
    }
}
