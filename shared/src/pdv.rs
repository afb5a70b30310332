//! Percent Daily Value (PDV) conversions
//!
//! The recipe dataset expresses nutrients as a percentage of a fixed daily
//! reference intake. This module converts those percentages back to absolute
//! amounts so they can feed the Nutri-Score.

use crate::nutriscore::NutrientProfile;
use serde::{Deserialize, Serialize};

/// Nutrient with a daily reference value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    TotalFat,
    SaturatedFat,
    Sugar,
    Sodium,
    Protein,
    Carbohydrates,
}

impl Nutrient {
    /// Daily reference intake (grams, or milligrams for sodium)
    pub fn daily_value(&self) -> f64 {
        match self {
            Nutrient::TotalFat => 70.0,
            Nutrient::SaturatedFat => 20.0,
            Nutrient::Sugar => 90.0,
            Nutrient::Sodium => 2400.0,
            Nutrient::Protein => 50.0,
            Nutrient::Carbohydrates => 260.0,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Sodium => "mg",
            _ => "g",
        }
    }
}

/// Convert a PDV percentage to an absolute amount
pub fn to_amount(pdv: f64, nutrient: Nutrient) -> f64 {
    pdv / 100.0 * nutrient.daily_value()
}

/// Nutrition facts of one recipe as found in the dataset:
/// calories followed by six PDV figures
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64,
    pub total_fat_pdv: f64,
    pub sugar_pdv: f64,
    pub sodium_pdv: f64,
    pub protein_pdv: f64,
    pub saturated_fat_pdv: f64,
    pub carbohydrates_pdv: f64,
}

/// Absolute nutrient amounts derived from the PDV figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientAmounts {
    pub total_fat_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub protein_g: f64,
    pub saturated_fat_g: f64,
}

impl NutritionFacts {
    pub fn amounts(&self) -> NutrientAmounts {
        NutrientAmounts {
            total_fat_g: to_amount(self.total_fat_pdv, Nutrient::TotalFat),
            sugar_g: to_amount(self.sugar_pdv, Nutrient::Sugar),
            sodium_mg: to_amount(self.sodium_pdv, Nutrient::Sodium),
            protein_g: to_amount(self.protein_pdv, Nutrient::Protein),
            saturated_fat_g: to_amount(self.saturated_fat_pdv, Nutrient::SaturatedFat),
        }
    }

    /// Nutri-Score inputs. The calorie figure is used as the energy input as-is.
    pub fn nutrient_profile(&self) -> NutrientProfile {
        let amounts = self.amounts();
        NutrientProfile::new(
            self.calories,
            amounts.sugar_g,
            amounts.saturated_fat_g,
            amounts.sodium_mg,
            amounts.protein_g,
        )
    }

    /// Element-wise sum, used for daily totals
    pub fn add(&self, other: &NutritionFacts) -> NutritionFacts {
        NutritionFacts {
            calories: self.calories + other.calories,
            total_fat_pdv: self.total_fat_pdv + other.total_fat_pdv,
            sugar_pdv: self.sugar_pdv + other.sugar_pdv,
            sodium_pdv: self.sodium_pdv + other.sodium_pdv,
            protein_pdv: self.protein_pdv + other.protein_pdv,
            saturated_fat_pdv: self.saturated_fat_pdv + other.saturated_fat_pdv,
            carbohydrates_pdv: self.carbohydrates_pdv + other.carbohydrates_pdv,
        }
    }
}

/// Parse the dataset's `nutrition` column, e.g. `[51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]`.
///
/// Returns `None` unless the list holds at least seven numbers.
pub fn parse_nutrition(raw: &str) -> Option<NutritionFacts> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let values: Vec<f64> = inner
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;

    if values.len() < 7 {
        return None;
    }

    Some(NutritionFacts {
        calories: values[0],
        total_fat_pdv: values[1],
        sugar_pdv: values[2],
        sodium_pdv: values[3],
        protein_pdv: values[4],
        saturated_fat_pdv: values[5],
        carbohydrates_pdv: values[6],
    })
}
