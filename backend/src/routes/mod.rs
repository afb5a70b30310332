//! Route definitions for the Nutri Coach API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method, Request},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::field::Empty;

mod activities;
mod auth;
mod chat;
mod dashboard;
mod fridge;
mod health;
mod pdv;
mod profile;
mod recipes;
mod weight;


pub use activities::activity_routes;
pub use auth::auth_routes;
pub use chat::chat_routes;
pub use fridge::fridge_routes;
pub use pdv::pdv_routes;
pub use profile::profile_routes;
pub use recipes::recipe_routes;
pub use weight::weight_routes;

/// `?limit=N` on history listings; absent means everything
#[derive(Debug, Deserialize)]
pub(crate) struct LimitQuery {
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        // A nested "/" only answers on "/api/v1"
        .route("/api/v1/", get(api_index))
        .nest("/api/v1", api_routes())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        // `user_id` is filled in by the auth extractor
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
                user_id = Empty,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn api_index() -> &'static str {
    "Nutri Coach API v1"
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(api_index))
        .nest("/auth", auth_routes())
        .nest("/profile", profile_routes())
        .nest("/weight", weight_routes())
        .nest("/pdv", pdv_routes())
        .nest("/fridge", fridge_routes())
        .nest("/recipes", recipe_routes())
        .nest("/activities", activity_routes())
        .nest("/chat", chat_routes())
        .route("/dashboard", get(dashboard::dashboard))
        .route("/admin/database", get(dashboard::database))
}
