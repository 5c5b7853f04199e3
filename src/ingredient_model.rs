//! # Ingredient and Nutrition Data Model
//!
//! This module defines the request-scoped records that flow through a recipe
//! analysis: ingredients extracted from the recipe text, per-ingredient
//! nutrition summaries, and the aggregated recipe result.
//!
//! ## Usage
//!
//! ```rust
//! use recipe_carbs::ingredient_model::Ingredient;
//!
//! let flour = Ingredient::new("King Arthur flour", "flour", 100.0, "100", "g");
//! assert_eq!(flour.lookup_name(), "flour");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Marker stored in the original quantity fields of a merged ingredient
pub const MERGED_PLACEHOLDER: &str = "-";

/// One ingredient occurrence parsed from the text-generation response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Name as it appeared in the recipe (e.g., "Heinz ketchup")
    pub name: String,

    /// Name without brand qualifiers (e.g., "ketchup"), may be empty
    pub generic_name: String,

    /// Quantity converted to grams, `0.0` when it could not be determined
    pub quantity_grams: f64,

    /// Quantity in the original unit, or [`MERGED_PLACEHOLDER`]
    pub original_quantity: String,

    /// Original unit, or [`MERGED_PLACEHOLDER`]
    pub original_quantity_unit: String,
}

impl Ingredient {
    /// Create an ingredient from its parsed fields
    pub fn new(
        name: &str,
        generic_name: &str,
        quantity_grams: f64,
        original_quantity: &str,
        original_quantity_unit: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            generic_name: generic_name.to_string(),
            quantity_grams,
            original_quantity: original_quantity.to_string(),
            original_quantity_unit: original_quantity_unit.to_string(),
        }
    }

    /// Name sent to the nutrition service: the generic name, or the original
    /// name when no generic name was provided
    pub fn lookup_name(&self) -> &str {
        if self.generic_name.is_empty() {
            &self.name
        } else {
            &self.generic_name
        }
    }

    /// Key used to merge repeated ingredients.
    ///
    /// Same rule as [`Ingredient::lookup_name`], so two rows without a generic
    /// name only merge when their original names match.
    pub fn merge_key(&self) -> &str {
        self.lookup_name()
    }

    /// Whether this record is the result of merging several rows
    pub fn is_merged(&self) -> bool {
        self.original_quantity == MERGED_PLACEHOLDER
            && self.original_quantity_unit == MERGED_PLACEHOLDER
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} g)", self.lookup_name(), self.quantity_grams)
    }
}

/// Weight and carbohydrate pair for one ingredient or a whole recipe.
///
/// Only [`NutritionSummary::from_ratio`] and `+` produce values, so the
/// carbohydrate figure always follows from a weight:
///
/// ```compile_fail
/// use recipe_carbs::ingredient_model::NutritionSummary;
///
/// let forged = NutritionSummary { weight_grams: 100.0, carbs_grams: 500.0 };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutritionSummary {
    weight_grams: f64,
    carbs_grams: f64,
}

impl NutritionSummary {
    /// Build a summary from a weight and a carbohydrate-per-gram ratio.
    ///
    /// The carbohydrate figure is always derived from the ratio so the two
    /// fields stay consistent.
    pub fn from_ratio(weight_grams: f64, carbs_per_gram: f64) -> Self {
        Self {
            weight_grams,
            carbs_grams: weight_grams * carbs_per_gram,
        }
    }

    pub fn weight_grams(&self) -> f64 {
        self.weight_grams
    }

    pub fn carbs_grams(&self) -> f64 {
        self.carbs_grams
    }
}

impl std::ops::Add for NutritionSummary {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            weight_grams: self.weight_grams + other.weight_grams,
            carbs_grams: self.carbs_grams + other.carbs_grams,
        }
    }
}

/// Aggregated analysis output for one recipe.
///
/// Built only through [`RecipeResult::from_ingredients`]; there is no
/// deserializer that could carry in a total of its own:
///
/// ```compile_fail
/// use recipe_carbs::ingredient_model::RecipeResult;
///
/// let body = r#"{"total":{"weight_grams":9999.0,"carbs_grams":0.0},"ingredients":{}}"#;
/// let _ = serde_json::from_str::<RecipeResult>(body);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeResult {
    total: NutritionSummary,
    ingredients: BTreeMap<String, NutritionSummary>,
}

impl RecipeResult {
    /// Build a result from per-food summaries; the total is computed here and
    /// cannot be set independently.
    pub fn from_ingredients(ingredients: BTreeMap<String, NutritionSummary>) -> Self {
        let total = ingredients
            .values()
            .copied()
            .fold(NutritionSummary::default(), |acc, summary| acc + summary);

        Self { total, ingredients }
    }

    /// Sum over all ingredient entries
    pub fn total(&self) -> NutritionSummary {
        self.total
    }

    /// Per-food summaries keyed by the nutrition service's matched food name
    pub fn ingredients(&self) -> &BTreeMap<String, NutritionSummary> {
        &self.ingredients
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_name_prefers_generic_name() {
        let branded = Ingredient::new("Barilla spaghetti", "spaghetti", 200.0, "200", "g");
        assert_eq!(branded.lookup_name(), "spaghetti");

        let plain = Ingredient::new("sugar", "", 50.0, "50", "g");
        assert_eq!(plain.lookup_name(), "sugar");
        assert_eq!(plain.merge_key(), "sugar");
    }

    #[test]
    fn test_is_merged() {
        let merged = Ingredient::new("tomato", "tomato", 120.0, MERGED_PLACEHOLDER, MERGED_PLACEHOLDER);
        assert!(merged.is_merged());

        let single = Ingredient::new("tomato", "tomato", 50.0, "1", "pcs");
        assert!(!single.is_merged());
    }

    #[test]
    fn test_summary_from_ratio() {
        let summary = NutritionSummary::from_ratio(120.0, 0.1);
        assert_eq!(summary.weight_grams(), 120.0);
        assert!((summary.carbs_grams() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_recipe_result_total_matches_entries() {
        let mut entries = BTreeMap::new();
        entries.insert("egg".to_string(), NutritionSummary::from_ratio(120.0, 0.1));
        entries.insert("flour".to_string(), NutritionSummary::from_ratio(100.0, 0.75));

        let result = RecipeResult::from_ingredients(entries);

        assert!((result.total().weight_grams() - 220.0).abs() < 1e-9);
        assert!((result.total().carbs_grams() - 87.0).abs() < 1e-9);
        assert_eq!(result.ingredients().len(), 2);
    }

    #[test]
    fn test_summary_sum_keeps_carbs_derived_from_weight() {
        let flour = NutritionSummary::from_ratio(100.0, 0.75);
        let sugar = NutritionSummary::from_ratio(30.0, 1.0);

        let combined = flour + sugar;

        assert!((combined.weight_grams() - 130.0).abs() < 1e-9);
        assert!((combined.carbs_grams() - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_entry_total_equals_entry() {
        let mut entries = BTreeMap::new();
        entries.insert("egg".to_string(), NutritionSummary::from_ratio(120.0, 0.0));

        let result = RecipeResult::from_ingredients(entries);

        assert_eq!(result.total(), result.ingredients()["egg"]);
        assert_eq!(result.total().weight_grams(), 120.0);
    }

    #[test]
    fn test_empty_recipe_result() {
        let result = RecipeResult::from_ingredients(BTreeMap::new());
        assert_eq!(result.total(), NutritionSummary::default());
    }

    #[test]
    fn test_ingredient_display() {
        let ingredient = Ingredient::new("egg", "egg", 120.0, "2", "pcs");
        assert_eq!(ingredient.to_string(), "egg (120.00 g)");
    }
}
