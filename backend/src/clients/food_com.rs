//! Recipe image lookup on food.com
//!
//! Recipe pages live at `{base}/{name-with-dashes}-{id}`; the picture is the
//! first `<img>` inside the element carrying the `primary-image` class.

use super::{trim_base, ClientError, RecipeImageLookup};
use crate::config::RecipesConfig;
use anyhow::Result;
use async_trait::async_trait;
use regex_lite::Regex;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};

const PRIMARY_IMAGE_PATTERN: &str =
    r#"(?s)class="[^"]*primary-image[^"]*"[^>]*>.*?<img[^>]*?\ssrc="([^"]+)""#;

pub struct FoodComImageLookup {
    http: Client,
    base_url: String,
    primary_image: Regex,
}

impl FoodComImageLookup {
    pub fn new(config: &RecipesConfig) -> Result<Self> {
        Ok(Self {
            http: super::build_http_client(15)?,
            base_url: trim_base(&config.image_base_url).to_string(),
            primary_image: Regex::new(PRIMARY_IMAGE_PATTERN)?,
        })
    }

    pub fn page_url(&self, recipe_id: i64, recipe_name: &str) -> String {
        format!("{}/{}-{}", self.base_url, recipe_name.replace(' ', "-"), recipe_id)
    }

    pub fn extract_primary_image(&self, html: &str) -> Option<String> {
        self.primary_image
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl RecipeImageLookup for FoodComImageLookup {
    #[instrument(skip(self))]
    async fn image_url(&self, recipe_id: i64, recipe_name: &str) -> Result<Option<String>, ClientError> {
        let url = self.page_url(recipe_id, recipe_name);
        let response = self.http.get(&url).send().await?;

        if response.status() != StatusCode::OK {
            debug!(status = %response.status(), url = %url, "Recipe page unavailable");
            return Ok(None);
        }

        let html = response.text().await?;
        Ok(self.extract_primary_image(&html))
    }
}
