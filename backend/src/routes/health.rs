//! Health and metrics endpoints
//!
//! - /health - Basic health check
//! - /health/ready - Readiness probe (database and recipe catalog)
//! - /health/live - Liveness probe
//! - /metrics - Prometheus text exposition

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
    pub recipes: CheckStatus,
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn healthy(message: Option<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            message,
        }
    }
}

fn respond(status: &str, checks: Option<HealthChecks>) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(respond("healthy", None))
}

/// Returns 503 when the database is unreachable. An empty recipe catalog is
/// reported as degraded but does not block traffic.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = match db::health_check(state.db()).await {
        Ok(_) => CheckStatus::healthy(None),
        Err(e) => CheckStatus {
            status: "unhealthy".to_string(),
            message: Some(e.to_string()),
        },
    };

    let recipes = if state.catalog().is_empty() {
        CheckStatus {
            status: "degraded".to_string(),
            message: Some("recipe catalog is empty".to_string()),
        }
    } else {
        CheckStatus::healthy(Some(format!("{} recipes", state.catalog().len())))
    };

    let is_ready = database.status == "healthy";
    let checks = Some(HealthChecks { database, recipes });

    if is_ready {
        Ok(Json(respond("ready", checks)))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(respond("not_ready", checks))))
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(respond("alive", None))
}

/// 404 when no recorder was installed
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
