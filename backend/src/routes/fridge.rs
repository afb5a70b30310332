//! Fridge contents and picture upload routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::FridgeService;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use nutri_coach_shared::types::{DetectionResponse, FridgeContents, SetFridgeRequest};

/// Largest accepted fridge picture
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn fridge_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_contents).put(set_contents))
        .route("/detect", post(detect))
        .route("/detect-and-store", post(detect_and_store))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES))
}

/// Bytes of the `image` part; empty when the part is missing
async fn read_image(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }
    Ok(Vec::new())
}

/// GET /api/v1/fridge
async fn get_contents(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<FridgeContents>, ApiError> {
    Ok(Json(FridgeService::get(state.db(), auth.user_id).await?))
}

/// PUT /api/v1/fridge - Replace the stored contents
async fn set_contents(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SetFridgeRequest>,
) -> Result<Json<FridgeContents>, ApiError> {
    Ok(Json(FridgeService::set(state.db(), auth.user_id, &req).await?))
}

/// POST /api/v1/fridge/detect - multipart with an `image` part
async fn detect(
    State(state): State<AppState>,
    _auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    let image = read_image(multipart).await?;
    let detection =
        FridgeService::detect(state.detector.as_ref(), &state.config().detector, &image).await?;
    Ok(Json(detection))
}

/// POST /api/v1/fridge/detect-and-store
async fn detect_and_store(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<DetectionResponse>, ApiError> {
    let image = read_image(multipart).await?;
    let detection = FridgeService::detect_and_store(
        state.db(),
        state.detector.as_ref(),
        &state.config().detector,
        auth.user_id,
        &image,
    )
    .await?;
    Ok(Json(detection))
}
