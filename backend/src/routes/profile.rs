//! Personal information routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::{ProfileService, UserService};
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use nutri_coach_shared::types::{UpdateProfileRequest, UserProfileResponse};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/", get(get_profile).put(update_profile))
}

/// GET /api/v1/profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = UserService::get_profile(state.db(), auth.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Absent fields keep their stored value. The Garmin token is accepted
/// here but never returned.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserProfileResponse>, ApiError> {
    let profile = ProfileService::update(state.db(), auth.user_id, &req).await?;
    Ok(Json(profile))
}
