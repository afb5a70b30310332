//! Nutrition coach routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::ChatService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use nutri_coach_shared::types::{AskRequest, ChatMessageResponse, ChatQuestionsResponse};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(questions))
        .route("/ask", post(ask))
        .route("/history", get(history).delete(clear_history))
}

/// GET /api/v1/chat/questions
async fn questions(_auth: AuthUser) -> Json<ChatQuestionsResponse> {
    Json(ChatService::questions())
}

/// POST /api/v1/chat/ask - 503 when the chat API is not configured
async fn ask(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AskRequest>,
) -> Result<Json<ChatMessageResponse>, ApiError> {
    let reply = ChatService::ask(
        state.db(),
        state.chat(),
        &state.config().chat,
        auth.user_id,
        &req,
    )
    .await?;
    Ok(Json(reply))
}

/// GET /api/v1/chat/history
async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let messages = ChatService::history(state.db(), &state.config().chat, auth.user_id).await?;
    Ok(Json(messages))
}

/// DELETE /api/v1/chat/history
async fn clear_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, ApiError> {
    ChatService::clear(state.db(), auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
