//! Fridge contents and ingredient detection

use crate::clients::IngredientDetector;
use crate::config::DetectorConfig;
use crate::error::ApiError;
use crate::repositories::FridgeRepository;
use metrics::counter;
use nutri_coach_shared::recipes::normalize_selection;
use nutri_coach_shared::types::{DetectionResponse, FridgeContents, SetFridgeRequest};
use sqlx::SqlitePool;
use tracing::{debug, warn};
use validator::Validate;

pub struct FridgeService;

impl FridgeService {
    pub async fn get(pool: &SqlitePool, user_id: i64) -> Result<FridgeContents, ApiError> {
        let ingredients = FridgeRepository::list(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        Ok(FridgeContents { ingredients })
    }

    /// Replace the stored contents. An empty list empties the fridge.
    pub async fn set(
        pool: &SqlitePool,
        user_id: i64,
        req: &SetFridgeRequest,
    ) -> Result<FridgeContents, ApiError> {
        req.validate()?;
        let ingredients = normalize_selection(&req.ingredients);

        FridgeRepository::replace(pool, user_id, &ingredients)
            .await
            .map_err(ApiError::Internal)?;

        Self::get(pool, user_id).await
    }

    /// Detect ingredients in a fridge picture.
    ///
    /// A failing detector is not an error for the caller: the configured
    /// fallback list is returned with `fallback` set.
    pub async fn detect(
        detector: &dyn IngredientDetector,
        config: &DetectorConfig,
        image: &[u8],
    ) -> Result<DetectionResponse, ApiError> {
        if image.is_empty() {
            return Err(ApiError::invalid_field("image", "Upload an image of your fridge"));
        }

        match detector.classify(image, &config.candidate_labels).await {
            Ok(scores) => {
                // Candidate order, not score order
                let ingredients: Vec<String> = config
                    .candidate_labels
                    .iter()
                    .filter(|label| {
                        scores
                            .iter()
                            .any(|s| &s.label == *label && s.score > config.threshold)
                    })
                    .cloned()
                    .collect();

                debug!(detected = ?ingredients, "Ingredients detected");
                Ok(DetectionResponse {
                    ingredients,
                    fallback: false,
                    scores,
                })
            }
            Err(e) => {
                warn!(error = %e, "Ingredient detection failed, using fallback list");
                counter!("nutri_coach_detector_fallbacks_total").increment(1);
                Ok(DetectionResponse {
                    ingredients: config.fallback_ingredients.clone(),
                    fallback: true,
                    scores: Vec::new(),
                })
            }
        }
    }

    /// Detect ingredients and store them as the fridge contents
    pub async fn detect_and_store(
        pool: &SqlitePool,
        detector: &dyn IngredientDetector,
        config: &DetectorConfig,
        user_id: i64,
        image: &[u8],
    ) -> Result<DetectionResponse, ApiError> {
        let detection = Self::detect(detector, config, image).await?;

        FridgeRepository::replace(pool, user_id, &detection.ingredients)
            .await
            .map_err(ApiError::Internal)?;

        Ok(detection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ClientError;
    use async_trait::async_trait;
    use nutri_coach_shared::types::LabelScore;

    struct ScoredDetector;

    #[async_trait]
    impl IngredientDetector for ScoredDetector {
        async fn classify(&self, _image: &[u8], labels: &[String]) -> Result<Vec<LabelScore>, ClientError> {
            Ok(labels
                .iter()
                .map(|label| LabelScore {
                    label: label.clone(),
                    score: match label.as_str() {
                        "egg" => 0.45,
                        "tomato" => 0.3,
                        "cheese" => 0.1,
                        _ => 0.01,
                    },
                })
                .collect())
        }
    }

    struct BrokenDetector;

    #[async_trait]
    impl IngredientDetector for BrokenDetector {
        async fn classify(&self, _image: &[u8], _labels: &[String]) -> Result<Vec<LabelScore>, ClientError> {
            Err(ClientError::Status {
                status: 503,
                body: "loading".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_detect_keeps_labels_above_threshold() {
        let config = DetectorConfig::default();
        let detection = FridgeService::detect(&ScoredDetector, &config, b"jpeg").await.unwrap();

        assert!(!detection.fallback);
        // cheese sits exactly on the threshold and is dropped
        assert_eq!(detection.ingredients, vec!["tomato", "egg"]);
        assert_eq!(detection.scores.len(), config.candidate_labels.len());
    }

    #[tokio::test]
    async fn test_detect_falls_back_on_failure() {
        let detection = FridgeService::detect(&BrokenDetector, &DetectorConfig::default(), b"jpeg")
            .await
            .unwrap();

        assert!(detection.fallback);
        assert_eq!(detection.ingredients, vec!["chicken", "tomato", "lettuce"]);
    }

    #[tokio::test]
    async fn test_detect_rejects_empty_upload() {
        let err = FridgeService::detect(&ScoredDetector, &DetectorConfig::default(), b"")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidField { ref field, .. } if field == "image"));
    }
}
