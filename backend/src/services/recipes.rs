//! Recipe proposals, best-recipe selection and catalog analysis

use crate::catalog::RecipeCatalog;
use crate::clients::RecipeImageLookup;
use crate::config::RecipesConfig;
use crate::error::ApiError;
use crate::repositories::{FridgeRepository, UserRepository};
use crate::services::ActivityService;
use chrono::Utc;
use metrics::counter;
use nutri_coach_shared::energy::energy_needs;
use nutri_coach_shared::recipes::{self, grade_distribution, normalize_selection, score_statistics, Recipe};
use nutri_coach_shared::types::{
    BestRecipeResponse, PaginatedResponse, Pagination, ProposeRecipesRequest, RecipeAnalysisResponse,
    RecipeImageResponse, RecipeResponse,
};
use sqlx::SqlitePool;
use tracing::{debug, error};
use validator::Validate;

pub struct RecipeService;

impl RecipeService {
    /// Explicit selection, or the stored fridge contents when none is given
    async fn selection(
        pool: &SqlitePool,
        user_id: i64,
        ingredients: Option<&[String]>,
    ) -> Result<Vec<String>, ApiError> {
        let selection = match ingredients {
            Some(list) => normalize_selection(list),
            None => FridgeRepository::list(pool, user_id)
                .await
                .map_err(ApiError::Internal)?,
        };

        if selection.is_empty() {
            return Err(ApiError::invalid_field("ingredients", "Select at least one ingredient"));
        }
        Ok(selection)
    }

    async fn proposals<'a>(
        pool: &SqlitePool,
        catalog: &'a RecipeCatalog,
        config: &RecipesConfig,
        user_id: i64,
        req: &ProposeRecipesRequest,
    ) -> Result<Vec<&'a Recipe>, ApiError> {
        req.validate()?;
        let selection = Self::selection(pool, user_id, req.ingredients.as_deref()).await?;
        let min_matches = req.min_matches.unwrap_or(config.min_matches);

        let proposed = recipes::propose(catalog.recipes(), &selection, min_matches);
        counter!("nutri_coach_recipes_proposed_total").increment(proposed.len() as u64);
        debug!(selected = selection.len(), min_matches, proposed = proposed.len(), "Recipes proposed");

        Ok(proposed)
    }

    /// Recipes sharing enough ingredients with the selection, best score first
    pub async fn propose(
        pool: &SqlitePool,
        catalog: &RecipeCatalog,
        config: &RecipesConfig,
        user_id: i64,
        req: &ProposeRecipesRequest,
    ) -> Result<PaginatedResponse<RecipeResponse>, ApiError> {
        let proposed = Self::proposals(pool, catalog, config, user_id, req).await?;
        let pagination = Pagination::clamped(req.page, req.per_page, config.default_page_size, config.max_page_size);

        Ok(PaginatedResponse::from_items(
            proposed.into_iter().map(RecipeResponse::from).collect::<Vec<_>>(),
            &pagination,
        ))
    }

    /// The proposal closest to the user's meal targets for today
    pub async fn best(
        pool: &SqlitePool,
        catalog: &RecipeCatalog,
        config: &RecipesConfig,
        user_id: i64,
        req: &ProposeRecipesRequest,
    ) -> Result<BestRecipeResponse, ApiError> {
        let proposed = Self::proposals(pool, catalog, config, user_id, req).await?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
        let burned = ActivityService::burned_on(pool, user_id, Utc::now().date_naive()).await?;
        let needs = energy_needs(&user.energy_profile(), burned.calories);
        let targets = needs.meal_targets;

        let best = recipes::select_best(proposed.iter().copied(), targets.calories, targets.protein_g);

        Ok(BestRecipeResponse {
            recipe: best.map(RecipeResponse::from),
            targets,
            burned_calories: burned.calories,
            candidates: proposed.len(),
        })
    }

    /// Recipes whose every ingredient is in the stored fridge
    pub async fn makeable(
        pool: &SqlitePool,
        catalog: &RecipeCatalog,
        user_id: i64,
    ) -> Result<Vec<RecipeResponse>, ApiError> {
        let fridge = FridgeRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(recipes::makeable(catalog.recipes(), &fridge)
            .into_iter()
            .map(RecipeResponse::from)
            .collect())
    }

    pub fn get(catalog: &RecipeCatalog, recipe_id: i64) -> Result<RecipeResponse, ApiError> {
        catalog
            .get(recipe_id)
            .map(RecipeResponse::from)
            .ok_or_else(|| ApiError::NotFound(format!("Recipe {} not found", recipe_id)))
    }

    pub async fn image(
        catalog: &RecipeCatalog,
        lookup: &dyn RecipeImageLookup,
        recipe_id: i64,
    ) -> Result<RecipeImageResponse, ApiError> {
        let recipe = catalog
            .get(recipe_id)
            .ok_or_else(|| ApiError::NotFound(format!("Recipe {} not found", recipe_id)))?;

        let image_url = lookup
            .image_url(recipe.id, &recipe.name)
            .await
            .map_err(|e| {
                error!(recipe_id, error = %e, "Recipe image lookup failed");
                ApiError::Upstream("An error occurred with the API".to_string())
            })?
            .ok_or_else(|| ApiError::NotFound("No image found for this recipe".to_string()))?;

        Ok(RecipeImageResponse { recipe_id, image_url })
    }

    pub fn analysis(catalog: &RecipeCatalog) -> RecipeAnalysisResponse {
        RecipeAnalysisResponse {
            total_recipes: catalog.len(),
            statistics: score_statistics(catalog.recipes()),
            grade_distribution: grade_distribution(catalog.recipes()),
        }
    }
}
