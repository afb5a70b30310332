//! Recipe catalog routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::RecipeService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use nutri_coach_shared::types::{
    BestRecipeResponse, PaginatedResponse, ProposeRecipesRequest, RecipeAnalysisResponse,
    RecipeImageResponse, RecipeResponse,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients", get(ingredients))
        .route("/propose", post(propose))
        .route("/best", post(best))
        .route("/analysis", get(analysis))
        .route("/makeable", get(makeable))
        .route("/:id", get(get_recipe))
        .route("/:id/image", get(image))
}

/// GET /api/v1/recipes/ingredients - Ingredients offered for manual selection
async fn ingredients(State(state): State<AppState>, _auth: AuthUser) -> Json<Vec<String>> {
    Json(state.catalog().ingredients().to_vec())
}

/// POST /api/v1/recipes/propose
///
/// Without `ingredients` the stored fridge contents are used.
async fn propose(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ProposeRecipesRequest>,
) -> Result<Json<PaginatedResponse<RecipeResponse>>, ApiError> {
    let page = RecipeService::propose(
        state.db(),
        state.catalog(),
        &state.config().recipes,
        auth.user_id,
        &req,
    )
    .await?;
    Ok(Json(page))
}

/// POST /api/v1/recipes/best
async fn best(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ProposeRecipesRequest>,
) -> Result<Json<BestRecipeResponse>, ApiError> {
    let best = RecipeService::best(
        state.db(),
        state.catalog(),
        &state.config().recipes,
        auth.user_id,
        &req,
    )
    .await?;
    Ok(Json(best))
}

/// GET /api/v1/recipes/analysis
async fn analysis(State(state): State<AppState>, _auth: AuthUser) -> Json<RecipeAnalysisResponse> {
    Json(RecipeService::analysis(state.catalog()))
}

/// GET /api/v1/recipes/makeable - Recipes the fridge fully covers
async fn makeable(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RecipeResponse>>, ApiError> {
    Ok(Json(RecipeService::makeable(state.db(), state.catalog(), auth.user_id).await?))
}

/// GET /api/v1/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeResponse>, ApiError> {
    Ok(Json(RecipeService::get(state.catalog(), id)?))
}

/// GET /api/v1/recipes/:id/image - Picture from the recipe's food.com page
async fn image(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<RecipeImageResponse>, ApiError> {
    let image = RecipeService::image(state.catalog(), state.images.as_ref(), id).await?;
    Ok(Json(image))
}
