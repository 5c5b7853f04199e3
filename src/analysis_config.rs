//! # Analysis Configuration Module
//!
//! This module defines configuration structures for the recipe analysis
//! pipeline, the upstream service clients, and the chat front-end.
//! Values are read from the process environment; credentials are passed
//! through as-is and never validated here.

use std::env;
use tracing::warn;

// Constants for service configuration
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_NUTRITIONIX_BASE_URL: &str = "https://trackapi.nutritionix.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MIN_RECIPE_LENGTH: usize = 10;
pub const DEFAULT_LOCALES_DIR: &str = "./locales";

/// Settings for the OpenAI-compatible text-generation service
#[derive(Debug, Clone)]
pub struct TextServiceConfig {
    /// Bearer token
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling
    pub top_p: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TextServiceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.5,
            top_p: 1.0,
            max_tokens: 1000,
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Settings for the Nutritionix natural-language nutrients endpoint
#[derive(Debug, Clone)]
pub struct NutritionServiceConfig {
    /// `x-app-id` header value
    pub app_id: String,
    /// `x-app-key` header value
    pub api_key: String,
    /// Base URL, without the `/v2/natural/nutrients` suffix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NutritionServiceConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            base_url: DEFAULT_NUTRITIONIX_BASE_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub text_service: TextServiceConfig,
    pub nutrition_service: NutritionServiceConfig,
    /// Messages shorter than this (in characters) are not sent for analysis
    pub min_recipe_length: usize,
    /// Directory holding `<lang>/main.ftl` resources
    pub locales_dir: String,
    /// Emit logs as JSON instead of human-readable lines
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            text_service: TextServiceConfig::default(),
            nutrition_service: NutritionServiceConfig::default(),
            min_recipe_length: DEFAULT_MIN_RECIPE_LENGTH,
            locales_dir: DEFAULT_LOCALES_DIR.to_string(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Missing keys keep their defaults; unparseable numbers fall back to the
    /// default with a warning.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recipe_carbs::analysis_config::AppConfig;
    ///
    /// let config = AppConfig::from_lookup(|key| match key {
    ///     "OPENAI_MODEL" => Some("gpt-4o-mini".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.text_service.model, "gpt-4o-mini");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout_secs = parse_or_default(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS);

        let text_service = TextServiceConfig {
            api_key: lookup("OPENAI_TOKEN").unwrap_or_default(),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or(defaults.text_service.base_url),
            model: lookup("OPENAI_MODEL").unwrap_or(defaults.text_service.model),
            timeout_secs,
            ..TextServiceConfig::default()
        };

        let nutrition_service = NutritionServiceConfig {
            app_id: lookup("NUTRITIONIX_APP_ID").unwrap_or_default(),
            api_key: lookup("NUTRITIONIX_API_KEY").unwrap_or_default(),
            base_url: lookup("NUTRITIONIX_BASE_URL").unwrap_or(defaults.nutrition_service.base_url),
            timeout_secs,
        };

        Self {
            text_service,
            nutrition_service,
            min_recipe_length: parse_or_default(&lookup, "MIN_RECIPE_LENGTH", DEFAULT_MIN_RECIPE_LENGTH),
            locales_dir: lookup("LOCALES_DIR").unwrap_or(defaults.locales_dir),
            json_logs: lookup("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key = %key, value = %raw, default = %default, "Invalid numeric setting, using default");
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(|_| None);

        assert!(config.text_service.api_key.is_empty());
        assert_eq!(config.text_service.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.text_service.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.text_service.max_tokens, 1000);
        assert_eq!(config.nutrition_service.base_url, DEFAULT_NUTRITIONIX_BASE_URL);
        assert_eq!(config.min_recipe_length, 10);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_credentials_are_read() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_TOKEN", "sk-test"),
            ("NUTRITIONIX_APP_ID", "app"),
            ("NUTRITIONIX_API_KEY", "key"),
            ("LOG_FORMAT", "JSON"),
        ]));

        assert_eq!(config.text_service.api_key, "sk-test");
        assert_eq!(config.nutrition_service.app_id, "app");
        assert_eq!(config.nutrition_service.api_key, "key");
        assert!(config.json_logs);
    }

    #[test]
    fn test_invalid_numbers_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("HTTP_TIMEOUT_SECS", "soon"),
            ("MIN_RECIPE_LENGTH", "20"),
        ]));

        assert_eq!(config.text_service.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.nutrition_service.timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS);
        assert_eq!(config.min_recipe_length, 20);
    }
}
