//! Recipe dataset preparation
//!
//! Turns the raw Food.com export into the processed catalog: nutrition
//! parsed, Nutri-Score computed, recipes sorted by ascending score and
//! ingredients mapped onto canonical categories. Recipes matching no
//! category are dropped.

use anyhow::{Context, Result};
use nutri_coach_shared::nutriscore;
use nutri_coach_shared::pdv::parse_nutrition;
use nutri_coach_shared::recipes::{categorize, parse_ingredient_list, Recipe};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::io;
use tracing::debug;

/// Row of the raw export (`RAW_recipes.csv`); other columns are ignored
#[derive(Debug, Deserialize)]
struct RawRow {
    id: i64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    minutes: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ingredients: Option<String>,
    #[serde(default)]
    nutrition: Option<String>,
}

/// Row of the processed catalog
#[derive(Debug, Serialize, Deserialize)]
struct CatalogRow {
    id: i64,
    name: String,
    #[serde(default)]
    minutes: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    ingredients: String,
    #[serde(default)]
    nutrition: Option<String>,
    /// Older exports write the score as a float
    #[serde(default)]
    nutriscore: Option<f64>,
    #[serde(default)]
    grade: Option<String>,
    #[serde(default, alias = "category_list_fuzzy")]
    categories: Option<String>,
}

/// Counters reported by `prepare`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepareReport {
    pub read: usize,
    pub unnamed: usize,
    pub unscored: usize,
    pub uncategorized: usize,
    pub kept: usize,
}

/// Ascending score, recipes without a score last; stable
pub fn sort_by_score(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| match (a.nutriscore, b.nutriscore) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn score_recipe(row: RawRow) -> Option<Recipe> {
    let name = row.name.filter(|n| !n.trim().is_empty())?;
    let ingredients = row
        .ingredients
        .as_deref()
        .map(parse_ingredient_list)
        .unwrap_or_default();
    let nutrition = row.nutrition.as_deref().and_then(parse_nutrition);
    let score = nutrition.and_then(|n| nutriscore::compute(&n.nutrient_profile()));
    let categories = categorize(&ingredients);

    Some(Recipe {
        id: row.id,
        name: name.trim().to_string(),
        minutes: row.minutes,
        description: row.description,
        ingredients,
        nutrition,
        nutriscore: score.map(|s| s.score),
        grade: score.map(|s| s.grade),
        categories,
    })
}

/// Run the preparation pipeline over a raw export
pub fn prepare<R: io::Read>(raw: R) -> Result<(Vec<Recipe>, PrepareReport)> {
    let mut reader = csv::Reader::from_reader(raw);
    let mut report = PrepareReport::default();
    let mut recipes = Vec::new();

    for (line, row) in reader.deserialize::<RawRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed raw recipe on row {}", line + 1))?;
        report.read += 1;

        let Some(recipe) = score_recipe(row) else {
            report.unnamed += 1;
            continue;
        };
        if recipe.nutriscore.is_none() {
            report.unscored += 1;
        }
        if recipe.categories.is_empty() {
            report.uncategorized += 1;
            continue;
        }
        recipes.push(recipe);
    }

    sort_by_score(&mut recipes);
    report.kept = recipes.len();
    debug!(?report, "Recipe dataset prepared");

    Ok((recipes, report))
}

/// Python-style list literal, the format the dataset uses for list columns
fn format_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| {
            if item.contains('\'') {
                format!("\"{}\"", item)
            } else {
                format!("'{}'", item)
            }
        })
        .collect();
    format!("[{}]", quoted.join(", "))
}

fn format_nutrition(recipe: &Recipe) -> Option<String> {
    recipe.nutrition.map(|n| {
        format!(
            "[{}, {}, {}, {}, {}, {}, {}]",
            n.calories,
            n.total_fat_pdv,
            n.sugar_pdv,
            n.sodium_pdv,
            n.protein_pdv,
            n.saturated_fat_pdv,
            n.carbohydrates_pdv
        )
    })
}

/// Write the processed catalog
pub fn write_catalog<W: io::Write>(out: W, recipes: &[Recipe]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for recipe in recipes {
        writer.serialize(CatalogRow {
            id: recipe.id,
            name: recipe.name.clone(),
            minutes: recipe.minutes,
            description: recipe.description.clone(),
            ingredients: format_list(&recipe.ingredients),
            nutrition: format_nutrition(recipe),
            nutriscore: recipe.nutriscore.map(f64::from),
            grade: recipe.grade.map(|g| g.to_string()),
            categories: Some(format_list(&recipe.categories)),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a processed catalog, as written by `write_catalog`
pub fn read_catalog<R: io::Read>(input: R) -> Result<Vec<Recipe>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut recipes = Vec::new();

    for (line, row) in reader.deserialize::<CatalogRow>().enumerate() {
        let row = row.with_context(|| format!("Malformed catalog entry on row {}", line + 1))?;

        let mut seen = HashSet::new();
        let categories = row
            .categories
            .as_deref()
            .map(parse_ingredient_list)
            .unwrap_or_default()
            .into_iter()
            .filter(|c| c != "none" && seen.insert(c.clone()))
            .collect();

        recipes.push(Recipe {
            id: row.id,
            name: row.name,
            minutes: row.minutes,
            description: row.description,
            ingredients: parse_ingredient_list(&row.ingredients),
            nutrition: row.nutrition.as_deref().and_then(parse_nutrition),
            nutriscore: row.nutriscore.map(|s| s.round() as i32),
            grade: row.grade.and_then(|g| g.parse().ok()),
            categories,
        });
    }

    Ok(recipes)
}
