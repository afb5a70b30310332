//! Fitness activity routes

use super::LimitQuery;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ActivityService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use nutri_coach_shared::types::{
    ActivityResponse, DailyBurnedResponse, DateQuery, ImportActivitiesResponse,
};

pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/import", post(import))
        .route("/burned", get(burned))
}

/// POST /api/v1/activities/import - Pull the latest walks from Garmin Connect
async fn import(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ImportActivitiesResponse>, ApiError> {
    let report = ActivityService::import(
        state.db(),
        state.activities.as_ref(),
        &state.config().garmin,
        auth.user_id,
    )
    .await?;
    Ok(Json(report))
}

/// GET /api/v1/activities - Newest first
async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    Ok(Json(ActivityService::list(state.db(), auth.user_id, query.limit).await?))
}

/// GET /api/v1/activities/burned?date=YYYY-MM-DD - Defaults to today (UTC)
async fn burned(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DateQuery>,
) -> Result<Json<DailyBurnedResponse>, ApiError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    Ok(Json(ActivityService::burned_on(state.db(), auth.user_id, date).await?))
}
