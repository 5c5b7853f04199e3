//! # Recipe Analyzer
//!
//! Composes ingredient extraction, nutrition lookup and report formatting into
//! a single analysis of one recipe text.

use std::sync::Arc;
use tracing::{error, info, Instrument};

use crate::analysis_errors::{AnalysisError, Result};
use crate::ingredient_parser::IngredientExtractor;
use crate::nutrition_calculator::NutritionCalculator;
use crate::nutrition_client::NutritionSource;
use crate::response_formatter::format_report;
use crate::text_generation::TextGenerator;

/// Runs the extraction → lookup → formatting pipeline
pub struct RecipeAnalyzer {
    extractor: IngredientExtractor,
    calculator: NutritionCalculator,
}

impl RecipeAnalyzer {
    pub fn new(extractor: IngredientExtractor, calculator: NutritionCalculator) -> Self {
        Self {
            extractor,
            calculator,
        }
    }

    /// Build an analyzer directly from the two upstream services
    pub fn from_services(
        generator: Arc<dyn TextGenerator>,
        nutrition: Arc<dyn NutritionSource>,
    ) -> Self {
        Self::new(
            IngredientExtractor::new(generator),
            NutritionCalculator::new(nutrition),
        )
    }

    /// Analyze a recipe and return the formatted report.
    ///
    /// Stage failures are logged here once and returned unchanged; no stage is
    /// retried.
    pub async fn analyze(&self, recipe_text: &str) -> Result<String> {
        let ingredients = self.extractor.extract(recipe_text).await.map_err(|e| {
            error!(stage = "extract", error = %e, "Recipe analysis failed");
            e
        })?;

        let result = self.calculator.lookup(&ingredients).await.map_err(|e| {
            error!(
                stage = "lookup",
                error = %e,
                ingredients_count = ingredients.len(),
                "Recipe analysis failed"
            );
            e
        })?;

        let report = format_report(&result);
        info!(report_length = report.len(), "Recipe analysis completed");
        Ok(report)
    }
}

/// Run [`RecipeAnalyzer::analyze`] in its own task and wait for it.
///
/// A panic or cancellation inside the task is reported as
/// [`AnalysisError::Interrupted`] instead of unwinding into the caller.
pub async fn analyze_supervised(analyzer: Arc<RecipeAnalyzer>, recipe_text: String) -> Result<String> {
    let span = tracing::Span::current();
    let task = tokio::spawn(
        async move { analyzer.analyze(&recipe_text).await }.instrument(span),
    );

    match task.await {
        Ok(outcome) => outcome,
        Err(join_error) => {
            let reason = if join_error.is_panic() {
                "analysis task panicked".to_string()
            } else {
                "analysis task was cancelled".to_string()
            };
            error!(error = %join_error, "{reason}");
            Err(AnalysisError::Interrupted(reason))
        }
    }
}
