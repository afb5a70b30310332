//! Common test utilities for integration tests
//!
//! Every `TestApp` owns a fresh in-memory SQLite database, a small recipe
//! catalog and in-process stand-ins for the third-party APIs.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fake::{Fake, Faker};
use nutri_coach_backend::{
    catalog::RecipeCatalog,
    clients::{
        ActivitySource, ChatCompletion, ClientError, GarminCredentials, ImportedActivity,
        IngredientDetector, RecipeImageLookup,
    },
    config::AppConfig,
    db, routes,
    state::AppState,
};
use nutri_coach_shared::models::{ChatRole, ChatTurn};
use nutri_coach_shared::nutriscore::Grade;
use nutri_coach_shared::pdv::NutritionFacts;
use nutri_coach_shared::recipes::Recipe;
use nutri_coach_shared::types::LabelScore;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "SecurePassword123!";
pub const WALK_DAY: &str = "2024-05-01";
const BOUNDARY: &str = "nutri-coach-test-boundary";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Same app with no chat API key configured
    pub async fn without_chat() -> Self {
        Self::build(false).await
    }

    async fn build(with_chat: bool) -> Self {
        let pool = db::create_pool("sqlite::memory:", 1)
            .await
            .expect("Failed to create test database pool");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let chat: Option<Arc<dyn ChatCompletion>> = if with_chat {
            Some(Arc::new(EchoChat))
        } else {
            None
        };

        let state = AppState::with_clients(
            pool.clone(),
            test_config(),
            test_catalog(),
            Arc::new(FixedWalks),
            chat,
            Arc::new(FixedDetector),
            Arc::new(FixedImages),
        );

        Self {
            app: routes::create_router(state),
            pool,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn call(&self, method: &str, path: &str, token: Option<&str>, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.call("GET", path, None, None).await
    }

    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.call("POST", path, None, Some(body)).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.call("GET", path, Some(token), None).await
    }

    pub async fn post_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.call("POST", path, Some(token), Some(body)).await
    }

    pub async fn put_auth(&self, path: &str, body: &str, token: &str) -> (StatusCode, String) {
        self.call("PUT", path, Some(token), Some(body)).await
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> (StatusCode, String) {
        self.call("DELETE", path, Some(token), None).await
    }

    /// POST a multipart form with a single file part
    pub async fn upload_auth(&self, path: &str, field: &str, bytes: &[u8], token: &str) -> (StatusCode, String) {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"fridge.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Register a user with a generated name and return it with its access token
    pub async fn create_test_user(&self) -> (String, String) {
        let username = format!("athlete_{}", Faker.fake::<u32>());
        let body = json!({
            "username": username,
            "password": PASSWORD,
            "confirm_password": PASSWORD,
        });

        let (status, response) = self.post("/api/v1/auth/register", &body.to_string()).await;
        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", response);

        let tokens: Value = serde_json::from_str(&response).unwrap();
        let token = tokens["access_token"].as_str().unwrap().to_string();
        (username, token)
    }
}

pub fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("invalid JSON ({}): {}", e, body))
}

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config.database.url = "sqlite::memory:".to_string();
    config
}

fn recipe(id: i64, name: &str, score: i32, calories: f64, protein_pdv: f64, ingredients: &[&str]) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        minutes: Some(25),
        description: None,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        nutrition: Some(NutritionFacts {
            calories,
            total_fat_pdv: 20.0,
            sugar_pdv: 10.0,
            sodium_pdv: 15.0,
            protein_pdv,
            saturated_fat_pdv: 25.0,
            carbohydrates_pdv: 12.0,
        }),
        nutriscore: Some(score),
        grade: Some(Grade::from_score(score)),
        categories: vec![],
    }
}

pub fn test_catalog() -> RecipeCatalog {
    RecipeCatalog::new(vec![
        recipe(1, "chicken rice bowl", 4, 900.0, 80.0, &["chicken breast", "tomato", "onion", "rice"]),
        recipe(2, "chicken tomato stew", -1, 620.0, 70.0, &["chicken", "tomato", "onion"]),
        recipe(3, "crepes", 12, 300.0, 10.0, &["egg", "milk", "flour"]),
        recipe(4, "tomato soup", 2, 640.0, 10.0, &["tomato", "onion", "garlic", "chicken stock"]),
    ])
}

/// Two walks on `WALK_DAY`, whatever the credentials
pub struct FixedWalks;

#[async_trait]
impl ActivitySource for FixedWalks {
    async fn recent_activities(
        &self,
        _credentials: &GarminCredentials,
        limit: u32,
    ) -> Result<Vec<ImportedActivity>, ClientError> {
        let walk = |external_id: i64, calories: f64| ImportedActivity {
            external_id,
            activity_name: Some("Morning walk".to_string()),
            start_time: format!("{} 07:30:00", WALK_DAY),
            calories: Some(calories),
            bmr_calories: Some(35.0),
            steps: Some(4200),
        };
        Ok(vec![walk(1001, 150.0), walk(1002, 90.0)]
            .into_iter()
            .take(limit as usize)
            .collect())
    }
}

/// Answers with the last user message
pub struct EchoChat;

#[async_trait]
impl ChatCompletion for EchoChat {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ClientError> {
        let last = turns
            .iter()
            .rev()
            .find(|t| t.role == ChatRole::User)
            .map(|t| t.content.clone())
            .unwrap_or_default();
        Ok(format!("Coach: {}", last))
    }
}

/// Sees eggs and tomatoes in every picture; fails on pictures that say "broken"
pub struct FixedDetector;

#[async_trait]
impl IngredientDetector for FixedDetector {
    async fn classify(&self, image: &[u8], labels: &[String]) -> Result<Vec<LabelScore>, ClientError> {
        if image == b"broken" {
            return Err(ClientError::Status {
                status: 503,
                body: "model loading".to_string(),
            });
        }
        Ok(labels
            .iter()
            .map(|label| LabelScore {
                label: label.clone(),
                score: match label.as_str() {
                    "egg" => 0.52,
                    "tomato" => 0.31,
                    _ => 0.02,
                },
            })
            .collect())
    }
}

/// Only recipe 1 has a picture
pub struct FixedImages;

#[async_trait]
impl RecipeImageLookup for FixedImages {
    async fn image_url(&self, recipe_id: i64, _recipe_name: &str) -> Result<Option<String>, ClientError> {
        Ok((recipe_id == 1).then(|| "https://img.example.com/chicken-rice-bowl.jpg".to_string()))
    }
}
