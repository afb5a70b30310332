//! Recipe matching and ranking
//!
//! Pure functions over the static recipe catalog:
//! - overlap filtering of recipes against a set of available ingredients
//! - "fully makeable" filtering against the fridge contents
//! - best-recipe selection against calorie and protein targets
//! - fuzzy mapping of raw ingredient names onto canonical categories
//! - score statistics for the dataset analysis

use crate::fuzzy::partial_ratio;
use crate::nutriscore::Grade;
use crate::pdv::NutritionFacts;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Minimum number of matching ingredients for a recipe to be proposed
pub const DEFAULT_MIN_MATCHES: usize = 3;

/// Partial-ratio score above which an ingredient maps to a category
pub const CATEGORY_MATCH_THRESHOLD: u8 = 80;

/// Bonus awarded by `select_best` when a recipe meets the protein goal
pub const PROTEIN_BONUS: f64 = 10.0;

/// Canonical ingredient categories recognised by the detector and the dataset
pub const INGREDIENT_CATEGORIES: [&str; 30] = [
    "apple", "banana", "beef", "blueberries", "bread", "butter", "carrot", "cheese", "chicken",
    "chicken_breast", "chocolate", "corn", "eggs", "flour", "goat_cheese", "green_beans",
    "ground_beef", "ham", "heavy_cream", "lime", "milk", "mushrooms", "onion", "potato", "shrimp",
    "spinach", "strawberries", "sugar", "sweet_potato", "tomato",
];

/// A recipe of the static catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub minutes: Option<i64>,
    pub description: Option<String>,
    /// Lower-cased, trimmed ingredient names
    pub ingredients: Vec<String>,
    pub nutrition: Option<NutritionFacts>,
    pub nutriscore: Option<i32>,
    pub grade: Option<Grade>,
    /// Canonical categories the ingredients map to
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Recipe {
    /// Ingredient text used for substring matching
    pub fn ingredients_text(&self) -> String {
        self.ingredients.join(", ")
    }

    pub fn calories(&self) -> Option<f64> {
        self.nutrition.map(|n| n.calories)
    }

    pub fn protein_g(&self) -> Option<f64> {
        self.nutrition.map(|n| n.amounts().protein_g)
    }
}

/// Parse an ingredient list, either a Python-style list literal
/// (`['a', 'b']`) or a plain comma-separated string.
pub fn parse_ingredient_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|part| {
            part.trim()
                .trim_matches(|c| c == '\'' || c == '"')
                .trim()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .collect()
}

/// Lower-case and trim a user-supplied ingredient selection, dropping blanks
pub fn normalize_selection(ingredients: &[String]) -> Vec<String> {
    ingredients
        .iter()
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
        .collect()
}

/// Number of query ingredients found in the recipe's ingredient text.
///
/// `query` must already be lower-cased.
pub fn overlap_count(recipe_text: &str, query: &[String]) -> usize {
    let text = recipe_text.to_lowercase();
    query.iter().filter(|ingredient| text.contains(ingredient.as_str())).count()
}

/// Recipes whose overlap with `query` is at least `min_matches`, in catalog order
pub fn propose<'a>(catalog: &'a [Recipe], query: &[String], min_matches: usize) -> Vec<&'a Recipe> {
    let query = normalize_selection(query);
    catalog
        .iter()
        .filter(|recipe| overlap_count(&recipe.ingredients_text(), &query) >= min_matches)
        .collect()
}

/// Recipes whose every ingredient is present in the fridge.
/// A recipe without ingredients is always makeable.
pub fn makeable<'a>(recipes: &'a [Recipe], fridge: &[String]) -> Vec<&'a Recipe> {
    let available: HashSet<String> = normalize_selection(fridge).into_iter().collect();
    recipes
        .iter()
        .filter(|recipe| recipe.ingredients.iter().all(|i| available.contains(i)))
        .collect()
}

/// Ranking score: closeness to the calorie goal plus a protein bonus
pub fn recipe_fit_score(calories: f64, protein_g: f64, calorie_goal: f64, protein_goal: f64) -> f64 {
    let mut score = -(calories - calorie_goal).abs();
    if protein_g >= protein_goal {
        score += PROTEIN_BONUS;
    }
    score
}

/// Pick the recipe with the highest fit score; ties keep the earliest.
/// Recipes without nutrition facts are ignored.
pub fn select_best<'a, I>(recipes: I, calorie_goal: f64, protein_goal: f64) -> Option<&'a Recipe>
where
    I: IntoIterator<Item = &'a Recipe>,
{
    let mut best: Option<(&Recipe, f64)> = None;

    for recipe in recipes {
        let (Some(calories), Some(protein)) = (recipe.calories(), recipe.protein_g()) else {
            continue;
        };
        let score = recipe_fit_score(calories, protein, calorie_goal, protein_goal);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((recipe, score)),
        }
    }

    best.map(|(recipe, _)| recipe)
}

/// Map a raw ingredient to the first canonical category it fuzzily matches
pub fn map_to_category(ingredient: &str) -> Option<&'static str> {
    let ingredient = ingredient.trim().to_lowercase();
    INGREDIENT_CATEGORIES
        .iter()
        .find(|category| partial_ratio(&ingredient, category) > CATEGORY_MATCH_THRESHOLD)
        .copied()
}

/// Distinct categories of an ingredient list, in first-seen order
pub fn categorize(ingredients: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ingredients
        .iter()
        .filter_map(|i| map_to_category(i))
        .filter(|c| seen.insert(*c))
        .map(str::to_string)
        .collect()
}

/// Sorted, de-duplicated ingredient names offered for manual selection
pub fn all_ingredients(catalog: &[Recipe]) -> Vec<String> {
    catalog
        .iter()
        .flat_map(|recipe| recipe.ingredients.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ============================================================================
// Dataset Analysis
// ============================================================================

/// Descriptive statistics of the catalog's scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two scores
    pub std: Option<f64>,
    pub min: i32,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: i32,
}

/// Count of recipes per grade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCount {
    pub grade: Grade,
    pub count: usize,
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Statistics over the recipes that carry a score
pub fn score_statistics(catalog: &[Recipe]) -> Option<ScoreStatistics> {
    let mut scores: Vec<i32> = catalog.iter().filter_map(|r| r.nutriscore).collect();
    if scores.is_empty() {
        return None;
    }
    scores.sort_unstable();

    let values: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    Some(ScoreStatistics {
        count,
        mean,
        std,
        min: scores[0],
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q3: quantile(&values, 0.75),
        max: scores[count - 1],
    })
}

/// Grade distribution, most frequent first
pub fn grade_distribution(catalog: &[Recipe]) -> Vec<GradeCount> {
    let mut counts: Vec<GradeCount> = Grade::ALL
        .iter()
        .map(|&grade| GradeCount {
            grade,
            count: catalog.iter().filter(|r| r.grade == Some(grade)).count(),
        })
        .filter(|gc| gc.count > 0)
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.grade.cmp(&b.grade)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recipe(id: i64, ingredients: &[&str], calories: f64, protein_pdv: f64) -> Recipe {
        Recipe {
            id,
            name: format!("recipe {}", id),
            minutes: Some(20),
            description: None,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            nutrition: Some(NutritionFacts {
                calories,
                protein_pdv,
                ..Default::default()
            }),
            nutriscore: Some(id as i32),
            grade: Some(Grade::from_score(id as i32)),
            categories: vec![],
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_python_list() {
        let parsed = parse_ingredient_list("['Winter Squash', 'mexican seasoning', \"honey\"]");
        assert_eq!(parsed, strings(&["winter squash", "mexican seasoning", "honey"]));
    }

    #[test]
    fn test_parse_plain_list() {
        assert_eq!(parse_ingredient_list(" eggs , milk,,flour "), strings(&["eggs", "milk", "flour"]));
        assert!(parse_ingredient_list("[]").is_empty());
    }

    #[test]
    fn test_overlap_count_is_substring_based() {
        let query = strings(&["chicken", "tomato", "rice"]);
        assert_eq!(overlap_count("boneless chicken breast, cherry tomatoes, salt", &query), 2);
        assert_eq!(overlap_count("", &query), 0);
    }

    #[test]
    fn test_propose_respects_minimum_and_order() {
        let catalog = vec![
            recipe(1, &["chicken", "tomato", "lettuce", "cucumber"], 350.0, 60.0),
            recipe(2, &["pasta", "tomato", "bell pepper"], 400.0, 30.0),
            recipe(3, &["egg", "mushroom", "cheese"], 300.0, 40.0),
            recipe(4, &["chicken breast", "tomato paste", "lettuce"], 500.0, 80.0),
        ];

        let query = strings(&["Chicken", "TOMATO", "lettuce"]);
        let ids: Vec<i64> = propose(&catalog, &query, 3).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);

        let ids: Vec<i64> = propose(&catalog, &query, 1).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_propose_empty_query() {
        let catalog = vec![recipe(1, &["chicken"], 100.0, 10.0)];
        assert!(propose(&catalog, &[], DEFAULT_MIN_MATCHES).is_empty());
    }

    #[test]
    fn test_makeable_requires_every_ingredient() {
        let catalog = vec![
            recipe(1, &["chicken", "lettuce", "tomato", "cucumber"], 350.0, 60.0),
            recipe(2, &["egg", "mushroom", "cheese"], 300.0, 40.0),
        ];
        let fridge = strings(&["egg", "Mushroom", "cheese", "tomato"]);
        let ids: Vec<i64> = makeable(&catalog, &fridge).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_makeable_recipe_without_ingredients() {
        let catalog = vec![recipe(7, &[], 120.0, 10.0), recipe(8, &["egg"], 90.0, 20.0)];
        let ids: Vec<i64> = makeable(&catalog, &[]).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7]);
    }

    #[test]
    fn test_select_best_prefers_calorie_fit_and_protein() {
        // protein_pdv 60 -> 30 g, 30 -> 15 g
        let recipes = vec![
            recipe(1, &["a"], 350.0, 60.0),
            recipe(2, &["b"], 345.0, 30.0),
            recipe(3, &["c"], 900.0, 100.0),
        ];
        // goal 340 kcal / 28 g: recipe 1 scores -10 + 10 = 0, recipe 2 scores -5
        let best = select_best(&recipes, 340.0, 28.0).unwrap();
        assert_eq!(best.id, 1);

        // without the bonus recipe 2 is closer
        let best = select_best(&recipes, 340.0, 200.0).unwrap();
        assert_eq!(best.id, 2);
    }

    #[test]
    fn test_select_best_empty_and_tie() {
        assert!(select_best(&[], 500.0, 20.0).is_none());

        let recipes = vec![recipe(1, &["a"], 400.0, 0.0), recipe(2, &["b"], 600.0, 0.0)];
        assert_eq!(select_best(&recipes, 500.0, 100.0).unwrap().id, 1);
    }

    #[test]
    fn test_map_to_category() {
        assert_eq!(map_to_category("Boneless Chicken Breast"), Some("chicken"));
        assert_eq!(map_to_category("ripe bananas"), Some("banana"));
        assert_eq!(map_to_category("fresh spinach"), Some("spinach"));
        assert_eq!(map_to_category("xanthan gum"), None);
    }

    #[test]
    fn test_categorize_deduplicates() {
        let categories = categorize(&strings(&["chicken thighs", "chicken wings", "onion", "salt"]));
        assert_eq!(categories, strings(&["chicken", "onion"]));
    }

    #[test]
    fn test_all_ingredients_sorted_unique() {
        let catalog = vec![
            recipe(1, &["tomato", "chicken"], 1.0, 1.0),
            recipe(2, &["chicken", "basil"], 1.0, 1.0),
        ];
        assert_eq!(all_ingredients(&catalog), strings(&["basil", "chicken", "tomato"]));
    }

    #[test]
    fn test_score_statistics() {
        let catalog: Vec<Recipe> = [1, 2, 3, 4].iter().map(|&i| recipe(i, &["x"], 1.0, 1.0)).collect();
        let stats = score_statistics(&catalog).unwrap();
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-9);
        assert!((stats.std.unwrap() - 1.2909944487).abs() < 1e-6);
        assert_eq!(stats.min, 1);
        assert!((stats.q1 - 1.75).abs() < 1e-9);
        assert!((stats.median - 2.5).abs() < 1e-9);
        assert!((stats.q3 - 3.25).abs() < 1e-9);
        assert_eq!(stats.max, 4);

        assert!(score_statistics(&[]).is_none());
    }

    #[test]
    fn test_grade_distribution_most_frequent_first() {
        let catalog: Vec<Recipe> = [-2, 4, 5, 6, 12].iter().map(|&i| recipe(i, &["x"], 1.0, 1.0)).collect();
        let distribution = grade_distribution(&catalog);
        assert_eq!(distribution[0], GradeCount { grade: Grade::C, count: 3 });
        assert_eq!(distribution.len(), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_propose_matches_exactly_those_meeting_minimum(
            recipe_ingredients in prop::collection::vec(
                prop::collection::vec("[a-e]{1,3}", 1..6), 0..20
            ),
            query in prop::collection::vec("[a-e]{1,3}", 0..6),
            min_matches in 0usize..5
        ) {
            let catalog: Vec<Recipe> = recipe_ingredients
                .iter()
                .enumerate()
                .map(|(i, ings)| {
                    let refs: Vec<&str> = ings.iter().map(String::as_str).collect();
                    recipe(i as i64, &refs, 100.0, 10.0)
                })
                .collect();

            let proposed: Vec<i64> = propose(&catalog, &query, min_matches).iter().map(|r| r.id).collect();
            let expected: Vec<i64> = catalog
                .iter()
                .filter(|r| overlap_count(&r.ingredients_text(), &query) >= min_matches)
                .map(|r| r.id)
                .collect();
            prop_assert_eq!(proposed, expected);
        }

        #[test]
        fn prop_select_best_is_maximal(
            entries in prop::collection::vec((0.0f64..2000.0, 0.0f64..200.0), 1..20),
            calorie_goal in 0.0f64..1500.0,
            protein_goal in 0.0f64..80.0
        ) {
            let recipes: Vec<Recipe> = entries
                .iter()
                .enumerate()
                .map(|(i, (cal, prot))| recipe(i as i64, &["x"], *cal, *prot))
                .collect();
            let best = select_best(&recipes, calorie_goal, protein_goal).unwrap();
            let best_score = recipe_fit_score(
                best.calories().unwrap(), best.protein_g().unwrap(), calorie_goal, protein_goal,
            );
            for r in &recipes {
                let s = recipe_fit_score(r.calories().unwrap(), r.protein_g().unwrap(), calorie_goal, protein_goal);
                prop_assert!(s <= best_score);
            }
        }
    }
}
