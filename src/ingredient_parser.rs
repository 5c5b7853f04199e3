//! # Ingredient Parser
//!
//! This module turns recipe text into structured ingredient records by asking
//! the text-generation service for a CSV table and parsing its response.
//!
//! ## Features
//!
//! - Fixed instruction prompt requesting gram-normalized CSV rows
//! - `NO_INGREDIENTS` sentinel detection
//! - Tolerant row parsing: malformed rows are skipped, unknown quantities become `0`
//! - Merging of repeated ingredients by canonical name
//!
//! ## Usage
//!
//! ```rust
//! use recipe_carbs::ingredient_parser::parse_ingredient_table;
//!
//! let csv = "name,generic_name,quantity_grams,original_quantity,original_quantity_unit\n\
//!            egg,egg,120,2,pcs\n\
//!            flour,flour,100,100,g";
//! let ingredients = parse_ingredient_table(csv)?;
//! assert_eq!(ingredients.len(), 2);
//! # Ok::<(), recipe_carbs::analysis_errors::AnalysisError>(())
//! ```

use csv::{ReaderBuilder, StringRecord, Trim};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

use crate::analysis_errors::{AnalysisError, Result};
use crate::ingredient_model::{Ingredient, MERGED_PLACEHOLDER};
use crate::text_generation::TextGenerator;

/// Response body the text-generation service returns when the text holds no recipe
pub const NO_INGREDIENTS_SENTINEL: &str = "NO_INGREDIENTS";

/// Rows with fewer fields than this cannot be mapped to an ingredient
pub const MIN_ROW_FIELDS: usize = 4;

/// Instruction sent ahead of every recipe
pub const PARSER_PROMPT: &str = "I will give you a dish recipe. \
Provide a list of ingredients of this dish. \
If you found zero ingredients or text is unrelated to recipes, respond with \"NO_INGREDIENTS\" text only. \
Try to provide a generic name for every ingredient in the generic_name field. Generic name is the name without any brands. \
Convert every possible measurement to grams. \
Parse every ingredient into a csv line with fields: \
name, generic_name, quantity_grams, original_quantity, original_quantity_unit. \
The first line must be this header. \
name field is the original input name of the ingredient. \
generic_name field is the generic name of the ingredient. \
quantity_grams field is the amount of ingredient in grams. If unable to calculate quantity_grams, use \"NO_QUANTITY\" value. \
original_quantity field is the amount of ingredient in original units. \
original_quantity_unit field is the original unit if it is different from grams. \
original_quantity and original_quantity_unit are filled only if this ingredient was converted to grams. \
Return csv data only.";

/// Matches a response wrapped in a markdown code fence, optionally tagged (```csv)
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[A-Za-z]*[ \t]*\r?\n(.*?)\r?\n?```$").expect("Code fence pattern should be valid")
});

/// Extracts ingredients from recipe text through a text-generation service
pub struct IngredientExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl IngredientExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the service for the recipe's ingredients and parse the answer.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::TextServiceFailure`] when the service call fails
    /// - [`AnalysisError::EmptyRecipe`] for the sentinel answer or when no row is usable
    /// - [`AnalysisError::MalformedResponse`] when the answer has no header row
    pub async fn extract(&self, recipe_text: &str) -> Result<Vec<Ingredient>> {
        debug!(text_length = recipe_text.len(), "Requesting ingredient table");

        let content = self.generator.complete(PARSER_PROMPT, recipe_text).await?;
        debug!(response = %content, "Received ingredient table");

        let ingredients = parse_ingredient_table(&content)?;
        for ingredient in &ingredients {
            debug!(ingredient = %ingredient, merged = ingredient.is_merged(), "Extracted ingredient");
        }
        info!(ingredients_count = ingredients.len(), "Ingredient extraction completed");

        Ok(ingredients)
    }
}

/// Parse a text-generation response into merged ingredient records
pub fn parse_ingredient_table(content: &str) -> Result<Vec<Ingredient>> {
    let content = strip_code_fence(content.trim());

    if content == NO_INGREDIENTS_SENTINEL {
        return Err(AnalysisError::EmptyRecipe);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    // The header only has to exist; its column names are not checked.
    let header = reader
        .headers()
        .map_err(|e| AnalysisError::MalformedResponse(format!("failed to read csv header: {e}")))?;
    if header.iter().all(str::is_empty) {
        return Err(AnalysisError::MalformedResponse("csv header is missing".to_string()));
    }

    let mut rows = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => match ingredient_from_record(&record) {
                Some(ingredient) => rows.push(ingredient),
                None => warn!(row = row_index + 1, fields = record.len(), "Skipping ingredient row with too few fields"),
            },
            Err(e) => warn!(row = row_index + 1, error = %e, "Skipping unparseable ingredient row"),
        }
    }

    if rows.is_empty() {
        return Err(AnalysisError::EmptyRecipe);
    }

    Ok(merge_ingredients(rows))
}

/// Map one CSV record to an ingredient, `None` if it has too few fields
pub fn ingredient_from_record(record: &StringRecord) -> Option<Ingredient> {
    if record.len() < MIN_ROW_FIELDS {
        return None;
    }

    let field = |index: usize| record.get(index).unwrap_or_default();

    let quantity_grams = match field(2).parse::<f64>() {
        Ok(grams) if grams.is_finite() && grams >= 0.0 => grams,
        _ => {
            debug!(ingredient = field(0), quantity = field(2), "Unknown gram quantity, using 0");
            0.0
        }
    };

    Some(Ingredient::new(field(0), field(1), quantity_grams, field(3), field(4)))
}

/// Merge ingredients sharing a canonical key into a single record.
///
/// Groups keep the order in which their key first appeared. A merged record
/// takes the first member's names, the summed gram quantity, and
/// [`MERGED_PLACEHOLDER`] for both original quantity fields.
pub fn merge_ingredients(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Ingredient>> = Vec::new();

    for ingredient in ingredients {
        let key = ingredient.merge_key().to_string();
        match group_index.get(&key) {
            Some(&index) => groups[index].push(ingredient),
            None => {
                group_index.insert(key, groups.len());
                groups.push(vec![ingredient]);
            }
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            if group.len() == 1 {
                return group.pop();
            }

            let quantity_grams: f64 = group.iter().map(|i| i.quantity_grams).sum();
            let first = &group[0];
            info!(
                ingredient = %first.merge_key(),
                entries = group.len(),
                quantity_grams,
                "Merging repeated ingredient"
            );

            Some(Ingredient::new(
                &first.name,
                &first.generic_name,
                quantity_grams,
                MERGED_PLACEHOLDER,
                MERGED_PLACEHOLDER,
            ))
        })
        .collect()
}

fn strip_code_fence(content: &str) -> &str {
    CODE_FENCE
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|inner| inner.as_str().trim())
        .unwrap_or(content)
}
