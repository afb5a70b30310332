//! Nutri Coach Shared Library
//!
//! Pure domain logic and API types used by the backend and the WASM module:
//! Nutri-Score, percent daily values, recipe matching and energy needs.

pub mod energy;
pub mod fuzzy;
pub mod models;
pub mod nutriscore;
pub mod pdv;
pub mod recipes;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use energy::{ActivityIntensity, EnergyNeeds, EnergyProfile, MealTargets, Sex};
pub use models::{ChatRole, ChatTurn};
pub use nutriscore::{Grade, NutriScore, NutrientProfile};
pub use pdv::{NutrientAmounts, NutritionFacts};
pub use recipes::Recipe;
pub use types::*;
