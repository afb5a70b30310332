//! Nutri Coach WASM Module
//!
//! Browser bindings for the score and energy calculations, so the UI can
//! preview results before submitting a form.

use nutri_coach_shared::energy::{self, ActivityIntensity, Sex};
use nutri_coach_shared::nutriscore::{self, NutrientProfile};
use nutri_coach_shared::pdv;
use wasm_bindgen::prelude::*;

/// Nutri-Score of a recipe given as calories plus PDV figures.
/// Returns `None` when any figure is not a number.
#[wasm_bindgen]
pub fn nutriscore_from_pdv(
    calories: f64,
    sugar_pdv: f64,
    sodium_pdv: f64,
    protein_pdv: f64,
    saturated_fat_pdv: f64,
) -> Option<i32> {
    let facts = pdv::NutritionFacts {
        calories,
        sugar_pdv,
        sodium_pdv,
        protein_pdv,
        saturated_fat_pdv,
        ..Default::default()
    };
    nutriscore::compute(&facts.nutrient_profile()).map(|result| result.score)
}

/// Nutri-Score of absolute nutrient amounts (grams, sodium in mg)
#[wasm_bindgen]
pub fn nutriscore(energy: f64, sugars_g: f64, saturated_fat_g: f64, sodium_mg: f64, protein_g: f64) -> Option<i32> {
    let profile = NutrientProfile::new(energy, sugars_g, saturated_fat_g, sodium_mg, protein_g);
    nutriscore::compute(&profile).map(|result| result.score)
}

/// Letter grade for a score
#[wasm_bindgen]
pub fn nutriscore_grade(score: i32) -> String {
    nutriscore::Grade::from_score(score).to_string()
}

/// Basal Metabolic Rate (Mifflin-St Jeor)
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: i32, is_male: bool) -> f64 {
    let sex = if is_male { Sex::Male } else { Sex::Female };
    energy::bmr(weight_kg, height_cm, age_years, sex)
}

/// TDEE from BMR, burned calories and an intensity name (low, moderate, high).
/// Unknown intensities count as low.
#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, burned_calories: f64, intensity: &str) -> f64 {
    let intensity = intensity.parse::<ActivityIntensity>().unwrap_or_default();
    energy::tdee(bmr, burned_calories, intensity)
}

/// Calorie goal of a single meal
#[wasm_bindgen]
pub fn meal_calorie_target(tdee: f64) -> f64 {
    energy::meal_targets(tdee, 0.0).calories
}

/// Protein goal of a single meal, in grams
#[wasm_bindgen]
pub fn meal_protein_target(weight_kg: f64) -> f64 {
    energy::meal_targets(0.0, weight_kg).protein_g
}
