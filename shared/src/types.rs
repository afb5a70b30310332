//! API request and response types

use crate::energy::{ActivityIntensity, EnergyNeeds, MealTargets, Sex};
use crate::models::ChatRole;
use crate::pdv::{NutrientAmounts, NutritionFacts};
use crate::recipes::{GradeCount, Recipe, ScoreStatistics};
use crate::nutriscore::Grade;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

impl Pagination {
    /// Clamp to page >= 1 and 1 <= per_page <= max
    pub fn clamped(page: Option<u32>, per_page: Option<u32>, default_per_page: u32, max_per_page: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, max_per_page.max(1)),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    /// Slice one page out of a complete result list
    pub fn from_items<I>(items: I, pagination: &Pagination) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let iter = items.into_iter();
        let total = iter.len() as u64;
        let per_page = pagination.per_page.max(1);
        let data = iter
            .skip(pagination.offset())
            .take(per_page as usize)
            .collect();

        Self {
            data,
            total,
            page: pagination.page,
            per_page,
            total_pages: total.div_ceil(per_page as u64) as u32,
        }
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Auth Types
// ============================================================================

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub confirm_password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// ============================================================================
// Profile Types
// ============================================================================

/// User profile response. The Garmin password is never returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_intensity: Option<ActivityIntensity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garmin_id: Option<String>,
    pub has_garmin_credentials: bool,
    pub created_at: DateTime<Utc>,
}

/// Personal information update; absent fields are left unchanged
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateProfileRequest {
    #[validate(range(min = 30.0, max = 200.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[validate(range(min = 100.0, max = 250.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[validate(range(min = 10, max = 120))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_intensity: Option<ActivityIntensity>,
    #[validate(length(max = 255))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garmin_id: Option<String>,
    #[validate(length(max = 4096))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garmin_token: Option<String>,
}

// ============================================================================
// Weight and PDV Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWeightRequest {
    #[validate(range(min = 30.0, max = 200.0))]
    pub weight_kg: f64,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightLogResponse {
    pub id: i64,
    pub weight_kg: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Record a meal's percent daily values, either explicitly or from a catalog recipe
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPdvRequest {
    #[validate(length(min = 1, max = 50))]
    pub meal: String,
    #[serde(default)]
    pub recipe_id: Option<i64>,
    #[serde(default)]
    pub nutrition: Option<NutritionFacts>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdvSnapshotResponse {
    pub id: i64,
    pub meal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<i64>,
    pub nutrition: NutritionFacts,
    pub recorded_at: DateTime<Utc>,
}

/// Summed daily values for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPdvSummary {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub totals: NutritionFacts,
    pub amounts: NutrientAmounts,
}

/// Date query parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

// ============================================================================
// Fridge Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FridgeContents {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetFridgeRequest {
    #[validate(length(max = 100))]
    pub ingredients: Vec<String>,
}

/// Probability assigned to one candidate label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub ingredients: Vec<String>,
    /// True when the detector failed and the default list was returned
    pub fallback: bool,
    #[serde(default)]
    pub scores: Vec<LabelScore>,
}

// ============================================================================
// Recipe Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionFacts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amounts: Option<NutrientAmounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutriscore: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    pub categories: Vec<String>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            minutes: recipe.minutes,
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            nutrition: recipe.nutrition,
            amounts: recipe.nutrition.map(|n| n.amounts()),
            nutriscore: recipe.nutriscore,
            grade: recipe.grade,
            categories: recipe.categories.clone(),
        }
    }
}

/// Propose recipes for a selection, or for the stored fridge when none is given
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct ProposeRecipesRequest {
    #[validate(length(max = 100))]
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[validate(range(min = 1, max = 50))]
    #[serde(default)]
    pub min_matches: Option<usize>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestRecipeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<RecipeResponse>,
    pub targets: MealTargets,
    pub burned_calories: f64,
    pub candidates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeImageResponse {
    pub recipe_id: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeAnalysisResponse {
    pub total_recipes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ScoreStatistics>,
    pub grade_distribution: Vec<GradeCount>,
}

// ============================================================================
// Activity Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub id: i64,
    pub external_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_name: Option<String>,
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmr_calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportActivitiesResponse {
    pub fetched: usize,
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBurnedResponse {
    pub date: NaiveDate,
    pub calories: f64,
    /// False when no activity was found and the default was used
    pub from_activities: bool,
}

// ============================================================================
// Chat Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatQuestionsResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AskRequest {
    #[validate(length(min = 1, max = 4000))]
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub id: i64,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Dashboard and Database Viewer
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub profile: UserProfileResponse,
    pub energy: EnergyNeeds,
    pub burned_today: DailyBurnedResponse,
    pub recent_activities: Vec<ActivityResponse>,
    pub weight_history: Vec<WeightLogResponse>,
    pub pdv_today: DailyPdvSummary,
    pub fridge: Vec<String>,
}

/// The current user's rows of every user-owned table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseDump {
    pub users: Vec<UserProfileResponse>,
    pub activities: Vec<ActivityResponse>,
    pub weights: Vec<WeightLogResponse>,
    pub pdv: Vec<PdvSnapshotResponse>,
}
