//! Static recipe catalog
//!
//! Loaded once at startup from the processed CSV and shared read-only
//! behind `Arc`. Recipes are kept in ascending Nutri-Score order, which is
//! the order every proposal list is returned in.

use anyhow::{Context, Result};
use nutri_coach_shared::recipes::{all_ingredients, Recipe};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::info;

pub mod dataset;

#[derive(Debug, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    index: HashMap<i64, usize>,
    ingredients: Vec<String>,
}

impl RecipeCatalog {
    pub fn new(mut recipes: Vec<Recipe>) -> Self {
        dataset::sort_by_score(&mut recipes);
        let index = recipes
            .iter()
            .enumerate()
            .map(|(position, recipe)| (recipe.id, position))
            .collect();
        let ingredients = all_ingredients(&recipes);

        Self {
            recipes,
            index,
            ingredients,
        }
    }

    /// Load the processed CSV written by `prepare-recipes`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open recipe catalog {}", path.display()))?;
        let catalog = Self::new(dataset::read_catalog(file)?);

        info!(
            recipes = catalog.len(),
            ingredients = catalog.ingredients.len(),
            path = %path.display(),
            "Recipe catalog loaded"
        );
        Ok(catalog)
    }

    #[inline]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: i64) -> Option<&Recipe> {
        self.index.get(&id).map(|&position| &self.recipes[position])
    }

    /// Ingredient names offered for manual selection
    #[inline]
    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
