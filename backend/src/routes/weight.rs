//! Weight history routes

use super::LimitQuery;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::WeightService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use nutri_coach_shared::types::{LogWeightRequest, WeightLogResponse};

pub fn weight_routes() -> Router<AppState> {
    Router::new().route("/", post(log_weight).get(get_weight_history))
}

/// POST /api/v1/weight - Log a weight entry in kg
async fn log_weight(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogWeightRequest>,
) -> Result<(StatusCode, Json<WeightLogResponse>), ApiError> {
    let log = WeightService::log_weight(state.db(), auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /api/v1/weight - Weight history, newest first
async fn get_weight_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<WeightLogResponse>>, ApiError> {
    let history = WeightService::history(state.db(), auth.user_id, query.limit).await?;
    Ok(Json(history))
}
