//! Percent daily value snapshots and daily summaries

use crate::catalog::RecipeCatalog;
use crate::error::ApiError;
use crate::repositories::{CreatePdvSnapshot, PdvRepository};
use chrono::{NaiveDate, Utc};
use nutri_coach_shared::pdv::NutritionFacts;
use nutri_coach_shared::types::{DailyPdvSummary, PdvSnapshotResponse, RecordPdvRequest};
use nutri_coach_shared::validation;
use sqlx::SqlitePool;
use validator::Validate;

pub struct PdvService;

fn validate_facts(facts: &NutritionFacts) -> Result<(), ApiError> {
    let values = [
        facts.calories,
        facts.total_fat_pdv,
        facts.sugar_pdv,
        facts.sodium_pdv,
        facts.protein_pdv,
        facts.saturated_fat_pdv,
        facts.carbohydrates_pdv,
    ];
    values
        .iter()
        .try_for_each(|&v| validation::validate_pdv(v))
        .map_err(|msg| ApiError::invalid_field("nutrition", msg))
}

impl PdvService {
    /// Record a meal from explicit values or from a catalog recipe
    pub async fn record(
        pool: &SqlitePool,
        catalog: &RecipeCatalog,
        user_id: i64,
        req: &RecordPdvRequest,
    ) -> Result<PdvSnapshotResponse, ApiError> {
        req.validate()?;
        validation::validate_meal(&req.meal).map_err(|msg| ApiError::invalid_field("meal", msg))?;

        let nutrition = match (req.recipe_id, req.nutrition) {
            (Some(recipe_id), _) => {
                let recipe = catalog
                    .get(recipe_id)
                    .ok_or_else(|| ApiError::NotFound(format!("Recipe {} not found", recipe_id)))?;
                recipe.nutrition.ok_or_else(|| {
                    ApiError::BadRequest(format!("Recipe {} has no nutrition facts", recipe_id))
                })?
            }
            (None, Some(nutrition)) => {
                validate_facts(&nutrition)?;
                nutrition
            }
            (None, None) => {
                return Err(ApiError::invalid_field(
                    "nutrition",
                    "Provide nutrition values or a recipe_id",
                ))
            }
        };

        let record = PdvRepository::create(
            pool,
            CreatePdvSnapshot {
                user_id,
                meal: req.meal.trim().to_string(),
                recipe_id: req.recipe_id,
                nutrition,
                recorded_at: req.recorded_at.unwrap_or_else(Utc::now),
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        Ok(record.into())
    }

    pub async fn list(pool: &SqlitePool, user_id: i64) -> Result<Vec<PdvSnapshotResponse>, ApiError> {
        let records = PdvRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Sum of the snapshots of one day
    pub async fn daily_summary(
        pool: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<DailyPdvSummary, ApiError> {
        let records = PdvRepository::list_on(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?;

        let totals = records
            .iter()
            .fold(NutritionFacts::default(), |acc, r| acc.add(&r.nutrition()));

        Ok(DailyPdvSummary {
            date,
            meal_count: records.len(),
            totals,
            amounts: totals.amounts(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::repositories::UserRepository;
    use chrono::TimeZone;
    use nutri_coach_shared::recipes::Recipe;

    fn catalog() -> RecipeCatalog {
        RecipeCatalog::new(vec![Recipe {
            id: 11,
            name: "omelette".to_string(),
            minutes: Some(10),
            description: None,
            ingredients: vec!["egg".to_string(), "butter".to_string()],
            nutrition: Some(NutritionFacts {
                calories: 250.0,
                total_fat_pdv: 30.0,
                sugar_pdv: 1.0,
                sodium_pdv: 10.0,
                protein_pdv: 30.0,
                saturated_fat_pdv: 40.0,
                carbohydrates_pdv: 1.0,
            }),
            nutriscore: Some(8),
            grade: None,
            categories: vec!["eggs".to_string(), "butter".to_string()],
        }])
    }

    fn request(meal: &str, recipe_id: Option<i64>, nutrition: Option<NutritionFacts>) -> RecordPdvRequest {
        RecordPdvRequest {
            meal: meal.to_string(),
            recipe_id,
            nutrition,
            recorded_at: Some(Utc.with_ymd_and_hms(2024, 4, 2, 12, 0, 0).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_record_from_recipe_and_summarize() {
        let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let user = UserRepository::create(&pool, "eater", "hash").await.unwrap();
        let catalog = catalog();

        let snapshot = PdvService::record(&pool, &catalog, user.id, &request("breakfast", Some(11), None))
            .await
            .unwrap();
        assert_eq!(snapshot.nutrition.calories, 250.0);
        assert_eq!(snapshot.recipe_id, Some(11));

        let explicit = NutritionFacts {
            calories: 150.0,
            protein_pdv: 10.0,
            ..Default::default()
        };
        PdvService::record(&pool, &catalog, user.id, &request("snack", None, Some(explicit)))
            .await
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let summary = PdvService::daily_summary(&pool, user.id, day).await.unwrap();
        assert_eq!(summary.meal_count, 2);
        assert_eq!(summary.totals.calories, 400.0);
        assert_eq!(summary.totals.protein_pdv, 40.0);
        assert_eq!(summary.amounts.protein_g, 20.0);

        let other = NaiveDate::from_ymd_opt(2024, 4, 3).unwrap();
        let empty = PdvService::daily_summary(&pool, user.id, other).await.unwrap();
        assert_eq!(empty.meal_count, 0);
        assert_eq!(empty.totals, NutritionFacts::default());
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_recipe_and_missing_values() {
        let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let user = UserRepository::create(&pool, "eater", "hash").await.unwrap();
        let catalog = catalog();

        let err = PdvService::record(&pool, &catalog, user.id, &request("lunch", Some(404), None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = PdvService::record(&pool, &catalog, user.id, &request("lunch", None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "nutrition"));

        let negative = NutritionFacts {
            sugar_pdv: -5.0,
            ..Default::default()
        };
        let err = PdvService::record(&pool, &catalog, user.id, &request("lunch", None, Some(negative)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidField { .. }));
    }
}
