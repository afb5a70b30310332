//! Energy needs calculations
//!
//! BMR, TDEE and per-meal targets derived from the user profile and the
//! calories burned through imported activities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_HEIGHT_CM: f64 = 175.0;
pub const DEFAULT_AGE_YEARS: i32 = 30;

/// Calories assumed burned on a day without imported activities
pub const DEFAULT_BURNED_CALORIES: f64 = 300.0;

/// Share of the TDEE targeted by a single meal
pub const MEAL_CALORIE_SHARE: f64 = 0.3;

/// Protein grams targeted per meal, per kg of body weight
pub const MEAL_PROTEIN_PER_KG: f64 = 0.4;

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex for physiological calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(format!("Unknown sex: {}", other)),
        }
    }
}

/// Self-reported training intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityIntensity {
    #[default]
    Low,
    Moderate,
    High,
}

impl ActivityIntensity {
    /// Multiplier applied to burned calories
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityIntensity::Low => 1.2,
            ActivityIntensity::Moderate => 1.55,
            ActivityIntensity::High => 1.725,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityIntensity::Low => "low",
            ActivityIntensity::Moderate => "moderate",
            ActivityIntensity::High => "high",
        }
    }
}

impl fmt::Display for ActivityIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityIntensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ActivityIntensity::Low),
            "moderate" => Ok(ActivityIntensity::Moderate),
            "high" => Ok(ActivityIntensity::High),
            other => Err(format!("Unknown activity intensity: {}", other)),
        }
    }
}

/// Profile data needed for energy calculations, defaults already applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: i32,
    pub sex: Sex,
    pub intensity: ActivityIntensity,
}

impl Default for EnergyProfile {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            height_cm: DEFAULT_HEIGHT_CM,
            age_years: DEFAULT_AGE_YEARS,
            sex: Sex::default(),
            intensity: ActivityIntensity::default(),
        }
    }
}

impl EnergyProfile {
    /// Build a profile from optional stored fields, falling back to defaults
    pub fn from_optional(
        weight_kg: Option<f64>,
        height_cm: Option<f64>,
        age_years: Option<i32>,
        sex: Option<Sex>,
        intensity: Option<ActivityIntensity>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            weight_kg: weight_kg.unwrap_or(defaults.weight_kg),
            height_cm: height_cm.unwrap_or(defaults.height_cm),
            age_years: age_years.unwrap_or(defaults.age_years),
            sex: sex.unwrap_or(defaults.sex),
            intensity: intensity.unwrap_or(defaults.intensity),
        }
    }
}

// ============================================================================
// BMR and TDEE
// ============================================================================

/// Basal Metabolic Rate (Mifflin-St Jeor)
///
/// Men: 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: i32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total daily energy expenditure: BMR plus burned calories scaled by intensity
pub fn tdee(bmr: f64, burned_calories: f64, intensity: ActivityIntensity) -> f64 {
    bmr + burned_calories * intensity.multiplier()
}

/// Calorie and protein goals for a single meal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MealTargets {
    pub calories: f64,
    pub protein_g: f64,
}

pub fn meal_targets(tdee: f64, weight_kg: f64) -> MealTargets {
    MealTargets {
        calories: tdee * MEAL_CALORIE_SHARE,
        protein_g: weight_kg * MEAL_PROTEIN_PER_KG,
    }
}

/// Full breakdown for one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyNeeds {
    pub bmr: f64,
    pub burned_calories: f64,
    pub activity_multiplier: f64,
    pub tdee: f64,
    pub meal_targets: MealTargets,
}

pub fn energy_needs(profile: &EnergyProfile, burned_calories: f64) -> EnergyNeeds {
    let bmr = bmr(profile.weight_kg, profile.height_cm, profile.age_years, profile.sex);
    let tdee = tdee(bmr, burned_calories, profile.intensity);

    EnergyNeeds {
        bmr,
        burned_calories,
        activity_multiplier: profile.intensity.multiplier(),
        tdee,
        meal_targets: meal_targets(tdee, profile.weight_kg),
    }
}
