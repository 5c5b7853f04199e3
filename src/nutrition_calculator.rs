//! # Nutrition Calculator
//!
//! Looks up nutrition facts for a list of ingredients and scales each food's
//! per-serving carbohydrates to the recipe's gram quantity.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analysis_errors::{AnalysisError, Result};
use crate::ingredient_model::{Ingredient, NutritionSummary, RecipeResult};
use crate::nutrition_client::NutritionSource;

/// Separator between ingredient names in the nutrition query
pub const QUERY_SEPARATOR: &str = ", ";

/// Computes weighted carbohydrate totals through a nutrition source
pub struct NutritionCalculator {
    source: Arc<dyn NutritionSource>,
}

impl NutritionCalculator {
    pub fn new(source: Arc<dyn NutritionSource>) -> Self {
        Self { source }
    }

    /// Look up every ingredient in one batched request.
    ///
    /// The service must answer with exactly one food per ingredient, in the
    /// same order. Results are keyed by the matched food name; when two
    /// ingredients match the same food, the later one replaces the earlier
    /// and the totals follow the surviving entries.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::NoIngredients`] for an empty list
    /// - [`AnalysisError::IngredientCountMismatch`] when the food count differs
    /// - errors from the nutrition source
    pub async fn lookup(&self, ingredients: &[Ingredient]) -> Result<RecipeResult> {
        if ingredients.is_empty() {
            return Err(AnalysisError::NoIngredients);
        }

        let query = build_query(ingredients);
        info!(query = %query, "Querying nutrition service");

        let foods = self.source.foods(&query).await?;
        if foods.len() != ingredients.len() {
            warn!(
                expected = ingredients.len(),
                actual = foods.len(),
                "Nutrition service could not match every ingredient"
            );
            return Err(AnalysisError::IngredientCountMismatch {
                expected: ingredients.len(),
                actual: foods.len(),
            });
        }

        let mut summaries = BTreeMap::new();
        for (ingredient, food) in ingredients.iter().zip(&foods) {
            let summary = NutritionSummary::from_ratio(ingredient.quantity_grams, food.carbs_per_gram());
            debug!(
                ingredient = %ingredient.lookup_name(),
                food = %food.food_name,
                weight_grams = summary.weight_grams(),
                carbs_grams = summary.carbs_grams(),
                "Ingredient nutrition computed"
            );

            if summaries.insert(food.food_name.clone(), summary).is_some() {
                warn!(food = %food.food_name, "Several ingredients matched the same food, keeping the last one");
            }
        }

        let result = RecipeResult::from_ingredients(summaries);
        info!(
            total_weight = result.total().weight_grams(),
            total_carbs = result.total().carbs_grams(),
            "Recipe nutrition computed"
        );

        Ok(result)
    }
}

/// Join the lookup names of all ingredients into one query string
pub fn build_query(ingredients: &[Ingredient]) -> String {
    ingredients
        .iter()
        .map(Ingredient::lookup_name)
        .collect::<Vec<_>>()
        .join(QUERY_SEPARATOR)
}
