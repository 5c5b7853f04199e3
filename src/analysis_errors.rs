//! # Analysis Error Types Module
//!
//! This module defines the error taxonomy for recipe analysis. Every variant is
//! terminal for the request that produced it and never affects other requests.

use thiserror::Error;

/// Errors produced while analyzing a recipe
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The text-generation service found no ingredients in the recipe
    #[error("No ingredients found in recipe")]
    EmptyRecipe,

    /// An upstream service returned a body with unexpected structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Network, authentication or rate-limit failure of the text-generation service
    #[error("Text service failure: {0}")]
    TextServiceFailure(String),

    /// Network, authentication or rate-limit failure of the nutrition service
    #[error("Nutrition service failure: {0}")]
    NutritionServiceFailure(String),

    /// Nutrition lookup was invoked with an empty ingredient list
    #[error("No ingredients to look up")]
    NoIngredients,

    /// The nutrition service did not return one food per ingredient
    #[error("Nutrition service returned {actual} foods for {expected} ingredients")]
    IngredientCountMismatch { expected: usize, actual: usize },

    /// The analysis task panicked or was cancelled
    #[error("Analysis interrupted: {0}")]
    Interrupted(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
