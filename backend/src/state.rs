//! Application state management
//!
//! Shared resources handed to every handler through Axum's state
//! extraction. Everything is created once at startup and cloned cheaply.

use crate::auth::JwtService;
use crate::catalog::RecipeCatalog;
use crate::clients::{
    ActivitySource, ChatCompletion, FoodComImageLookup, GarminClient, IngredientDetector,
    OpenAiChatClient, RecipeImageLookup, ZeroShotDetector,
};
use crate::config::AppConfig;
use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// Outbound services sit behind trait objects so tests can swap them.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    /// Pre-initialized JWT service with cached keys
    pub jwt: JwtService,
    pub catalog: Arc<RecipeCatalog>,
    pub activities: Arc<dyn ActivitySource>,
    /// `None` when no API key is configured
    pub chat: Option<Arc<dyn ChatCompletion>>,
    pub detector: Arc<dyn IngredientDetector>,
    pub images: Arc<dyn RecipeImageLookup>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build the state with the real HTTP clients
    pub fn new(db: SqlitePool, config: AppConfig, catalog: RecipeCatalog) -> Result<Self> {
        let activities = Arc::new(GarminClient::new(&config.garmin)?);
        let chat = OpenAiChatClient::from_config(&config.chat)?
            .map(|client| Arc::new(client) as Arc<dyn ChatCompletion>);
        let detector = Arc::new(ZeroShotDetector::new(&config.detector)?);
        let images = Arc::new(FoodComImageLookup::new(&config.recipes)?);

        Ok(Self::with_clients(db, config, catalog, activities, chat, detector, images))
    }

    /// Build the state around already constructed clients
    pub fn with_clients(
        db: SqlitePool,
        config: AppConfig,
        catalog: RecipeCatalog,
        activities: Arc<dyn ActivitySource>,
        chat: Option<Arc<dyn ChatCompletion>>,
        detector: Arc<dyn IngredientDetector>,
        images: Arc<dyn RecipeImageLookup>,
    ) -> Self {
        let jwt = JwtService::new(
            &config.jwt.secret,
            config.jwt.access_token_expiry_secs,
            config.jwt.refresh_token_expiry_secs,
        );

        Self {
            db,
            config: Arc::new(config),
            jwt,
            catalog: Arc::new(catalog),
            activities,
            chat,
            detector,
            images,
            metrics: None,
        }
    }

    /// Attach the Prometheus handle rendered at `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    #[inline]
    pub fn db(&self) -> &SqlitePool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    #[inline]
    pub fn chat(&self) -> Option<&dyn ChatCompletion> {
        self.chat.as_deref()
    }
}
