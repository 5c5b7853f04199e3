//! # Response Formatter
//!
//! Renders a [`RecipeResult`] as a Telegram MarkdownV2 report.

use crate::ingredient_model::RecipeResult;

/// Characters Telegram MarkdownV2 treats as markup
pub const MARKDOWN_V2_RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Format the per-ingredient and total report
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use recipe_carbs::ingredient_model::{NutritionSummary, RecipeResult};
/// use recipe_carbs::response_formatter::format_report;
///
/// let mut entries = BTreeMap::new();
/// entries.insert("egg".to_string(), NutritionSummary::from_ratio(120.0, 0.1));
/// let report = format_report(&RecipeResult::from_ingredients(entries));
/// assert!(report.contains("egg: 120\\.00 grams, 12\\.00 carbs"));
/// ```
pub fn format_report(result: &RecipeResult) -> String {
    let mut report = String::from("Ingredients:");

    for (name, summary) in result.ingredients() {
        report.push_str(&format!(
            "\n · {}: {} grams, {} carbs",
            escape_markdown(name),
            format_amount(summary.weight_grams()),
            format_amount(summary.carbs_grams())
        ));
    }
    report.push_str("\n\n");

    let total = result.total();
    report.push_str(&format!("\n Total weight: {}", format_amount(total.weight_grams())));
    report.push_str(&format!("\n Total carbs: {}", format_amount(total.carbs_grams())));

    report
}

/// Two-decimal number, escaped for MarkdownV2
pub fn format_amount(value: f64) -> String {
    escape_markdown(&format!("{value:.2}"))
}

/// Prefix every MarkdownV2 reserved character with a backslash
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_V2_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
