//! Configuration management for the Nutri Coach backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: NC__)

use anyhow::Result;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
    #[serde(default)]
    pub garmin: GarminConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
}

/// Recipe catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipesConfig {
    /// Processed CSV written by `prepare-recipes`
    pub csv_path: String,
    pub min_matches: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Base of the recipe pages the image lookup scrapes
    pub image_base_url: String,
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/processed_recipes_with_categories.csv".to_string(),
            min_matches: nutri_coach_shared::recipes::DEFAULT_MIN_MATCHES,
            default_page_size: 20,
            max_page_size: 100,
            image_base_url: "https://www.food.com/recipe".to_string(),
        }
    }
}

/// Garmin Connect import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarminConfig {
    pub base_url: String,
    /// Number of most recent activities fetched per import
    pub activity_limit: u32,
    /// Only activities of this type are imported
    pub activity_type: String,
    pub timeout_secs: u64,
}

impl Default for GarminConfig {
    fn default() -> Self {
        Self {
            base_url: "https://connectapi.garmin.com".to_string(),
            activity_limit: 20,
            activity_type: "walking".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Chat completion configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub base_url: String,
    /// The chat is disabled when no key is configured
    #[serde(default, serialize_with = "secret::serialize_optional")]
    pub api_key: Option<SecretString>,
    pub model: String,
    pub system_prompt: String,
    /// Stored messages replayed to the model on each request
    pub history_limit: i64,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            history_limit: 50,
            timeout_secs: 60,
        }
    }
}

/// Zero-shot ingredient detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub url: String,
    #[serde(default, serialize_with = "secret::serialize_optional")]
    pub api_token: Option<SecretString>,
    /// Labels scoring above this probability are kept
    pub threshold: f64,
    pub candidate_labels: Vec<String>,
    /// Returned when detection fails
    pub fallback_ingredients: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        let labels = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            url: "https://api-inference.huggingface.co/models/openai/clip-vit-base-patch32".to_string(),
            api_token: None,
            threshold: 0.1,
            candidate_labels: labels(&[
                "chicken", "lettuce", "tomato", "cucumber", "pasta", "bell pepper", "zucchini", "egg",
                "mushroom", "cheese", "banana",
            ]),
            fallback_ingredients: labels(&["chicken", "tomato", "lettuce"]),
            timeout_secs: 30,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "sqlite://data/users.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "development-secret-change-in-production".to_string(),
                access_token_expiry_secs: 3600,      // 1 hour
                refresh_token_expiry_secs: 604800,   // 7 days
            },
            recipes: RecipesConfig::default(),
            garmin: GarminConfig::default(),
            chat: ChatConfig::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with NC__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., NC__CHAT__API_KEY=sk-... sets chat.api_key
            .add_source(config::Environment::with_prefix("NC").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Configuration problems that must block a production start
    pub fn production_errors(&self) -> Vec<&'static str> {
        let mut errors = Vec::new();
        if self.jwt.secret.contains("development") || self.jwt.secret.len() < 32 {
            errors.push("JWT secret must be at least 32 characters and not contain 'development'");
        }
        if self.database.url.contains(":memory:") {
            errors.push("Database URL must point to a file in production");
        }
        errors
    }
}

mod secret {
    use secrecy::{ExposeSecret, SecretString};
    use serde::Serializer;

    /// Secrets only pass through serialization when layering the defaults source
    pub fn serialize_optional<S: Serializer>(
        value: &Option<SecretString>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(secret) => serializer.serialize_some(secret.expose_secret()),
            None => serializer.serialize_none(),
        }
    }
}
