//! Nutri-Score calculation
//!
//! Maps five nutrient values through fixed threshold tables to an integer
//! score and a letter grade (A best, E worst).
//!
//! Each table lists upper bounds: a value earns the index of the first
//! threshold it does not exceed, or the table length when it exceeds them all.
//! Energy, sugars, saturated fat and sodium count against the food; protein
//! counts in its favour.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Threshold Tables
// ============================================================================

/// Energy thresholds (same unit as the recipe dataset's calorie figure)
pub const ENERGY_THRESHOLDS: [f64; 10] = [
    335.0, 670.0, 1005.0, 1340.0, 1675.0, 2010.0, 2345.0, 2680.0, 3015.0, 3350.0,
];

/// Sugar thresholds in grams
pub const SUGARS_THRESHOLDS: [f64; 10] = [4.5, 9.0, 13.5, 18.0, 22.5, 27.0, 31.0, 36.0, 40.0, 45.0];

/// Saturated fat thresholds in grams
pub const SATURATED_FAT_THRESHOLDS: [f64; 10] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Sodium thresholds in milligrams
pub const SODIUM_THRESHOLDS: [f64; 10] = [
    90.0, 180.0, 270.0, 360.0, 450.0, 540.0, 630.0, 720.0, 810.0, 900.0,
];

/// Protein thresholds in grams
pub const PROTEIN_THRESHOLDS: [f64; 5] = [1.6, 3.2, 4.8, 6.4, 8.0];

/// Lowest reachable score (no negative points, full protein points)
pub const MIN_SCORE: i32 = -(PROTEIN_THRESHOLDS.len() as i32);

/// Highest reachable score (all negative tables maxed, no protein points)
pub const MAX_SCORE: i32 = 4 * ENERGY_THRESHOLDS.len() as i32;

fn points(value: f64, thresholds: &[f64]) -> i32 {
    thresholds
        .iter()
        .position(|&threshold| value <= threshold)
        .unwrap_or(thresholds.len()) as i32
}

pub fn energy_points(energy: f64) -> i32 {
    points(energy, &ENERGY_THRESHOLDS)
}

pub fn sugars_points(sugars_g: f64) -> i32 {
    points(sugars_g, &SUGARS_THRESHOLDS)
}

pub fn saturated_fat_points(saturated_fat_g: f64) -> i32 {
    points(saturated_fat_g, &SATURATED_FAT_THRESHOLDS)
}

pub fn sodium_points(sodium_mg: f64) -> i32 {
    points(sodium_mg, &SODIUM_THRESHOLDS)
}

pub fn protein_points(protein_g: f64) -> i32 {
    points(protein_g, &PROTEIN_THRESHOLDS)
}

// ============================================================================
// Grade
// ============================================================================

/// Nutri-Score letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    /// Grade for a final score
    pub fn from_score(score: i32) -> Self {
        match score {
            i32::MIN..=-1 => Grade::A,
            0..=2 => Grade::B,
            3..=10 => Grade::C,
            11..=18 => Grade::D,
            _ => Grade::E,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            other => Err(format!("Unknown Nutri-Score grade: {}", other)),
        }
    }
}

// ============================================================================
// Score
// ============================================================================

/// The five inputs of the score. `None` marks a missing value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub energy: Option<f64>,
    pub sugars_g: Option<f64>,
    pub saturated_fat_g: Option<f64>,
    pub sodium_mg: Option<f64>,
    pub protein_g: Option<f64>,
}

impl NutrientProfile {
    pub fn new(energy: f64, sugars_g: f64, saturated_fat_g: f64, sodium_mg: f64, protein_g: f64) -> Self {
        Self {
            energy: Some(energy),
            sugars_g: Some(sugars_g),
            saturated_fat_g: Some(saturated_fat_g),
            sodium_mg: Some(sodium_mg),
            protein_g: Some(protein_g),
        }
    }
}

/// Computed score with its component points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutriScore {
    pub score: i32,
    pub grade: Grade,
    pub negative_points: i32,
    pub positive_points: i32,
}

/// Compute the Nutri-Score of a profile.
///
/// Returns `None` when any input is missing or NaN.
pub fn compute(profile: &NutrientProfile) -> Option<NutriScore> {
    let present = |v: Option<f64>| v.filter(|x| !x.is_nan());

    let energy = present(profile.energy)?;
    let sugars = present(profile.sugars_g)?;
    let saturated_fat = present(profile.saturated_fat_g)?;
    let sodium = present(profile.sodium_mg)?;
    let protein = present(profile.protein_g)?;

    let negative_points = energy_points(energy)
        + sugars_points(sugars)
        + saturated_fat_points(saturated_fat)
        + sodium_points(sodium);
    let positive_points = protein_points(protein);
    let score = negative_points - positive_points;

    Some(NutriScore {
        score,
        grade: Grade::from_score(score),
        negative_points,
        positive_points,
    })
}
