//! Dashboard and database viewer routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::DashboardService;
use crate::state::AppState;
use axum::{extract::State, Json};
use nutri_coach_shared::types::{DashboardResponse, DatabaseDump};

/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    Ok(Json(DashboardService::overview(state.db(), auth.user_id).await?))
}

/// GET /api/v1/admin/database - The caller's own rows only
pub async fn database(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<DatabaseDump>, ApiError> {
    Ok(Json(DashboardService::database(state.db(), auth.user_id).await?))
}
