//! Percent daily value routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::PdvService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use nutri_coach_shared::types::{DailyPdvSummary, DateQuery, PdvSnapshotResponse, RecordPdvRequest};

pub fn pdv_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(record).get(list))
        .route("/summary", get(summary))
}

/// POST /api/v1/pdv - Record a meal from values or a recipe id
async fn record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<RecordPdvRequest>,
) -> Result<(StatusCode, Json<PdvSnapshotResponse>), ApiError> {
    let snapshot = PdvService::record(state.db(), state.catalog(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /api/v1/pdv
async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PdvSnapshotResponse>>, ApiError> {
    let snapshots = PdvService::list(state.db(), auth.user_id).await?;
    Ok(Json(snapshots))
}

/// GET /api/v1/pdv/summary?date=YYYY-MM-DD - Defaults to today (UTC)
async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyPdvSummary>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = PdvService::daily_summary(state.db(), auth.user_id, date).await?;
    Ok(Json(summary))
}
