//! # Localization Module
//!
//! Fluent-based translations for the messages the bot sends to users.
//! Resources live in `<locales_dir>/<lang>/main.ftl`; English is required and
//! is the fallback for every other language.

use anyhow::{Context, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Language used when a user's language is unknown or unsupported
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages shipped with the bot
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "fr"];

/// Localization manager for the bot's chat messages
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Load every supported language found under `locales_dir`
    ///
    /// # Errors
    ///
    /// Fails when the English resource is missing or cannot be parsed.
    pub fn load(locales_dir: impl AsRef<Path>) -> Result<Self> {
        let locales_dir = locales_dir.as_ref();
        let mut bundles = HashMap::new();

        for &language in SUPPORTED_LANGUAGES {
            match Self::create_bundle(locales_dir, language) {
                Ok(bundle) => {
                    bundles.insert(language.to_string(), bundle);
                }
                Err(e) if language == DEFAULT_LANGUAGE => return Err(e),
                Err(e) => warn!(language = %language, error = %e, "Skipping language"),
            }
        }

        debug!(languages = bundles.len(), "Localization resources loaded");
        Ok(Self { bundles })
    }

    fn create_bundle(locales_dir: &Path, language: &str) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = language.parse()?;
        let resource_path = locales_dir.join(language).join("main.ftl");

        let content = fs::read_to_string(&resource_path)
            .with_context(|| format!("Failed to read {}", resource_path.display()))?;
        let resource = FluentResource::try_new(content)
            .map_err(|(_, errors)| anyhow::anyhow!("Invalid Fluent syntax in {}: {errors:?}", resource_path.display()))?;

        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Plain-text chat messages, no bidi isolation marks around arguments.
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow::anyhow!("Duplicate messages in {}: {errors:?}", resource_path.display()))?;

        Ok(bundle)
    }

    /// Resolve a Telegram language code (e.g. `fr-CA`) to a loaded language
    pub fn resolve_language(&self, language_code: Option<&str>) -> &str {
        language_code
            .and_then(|code| code.split(['-', '_']).next())
            .map(|code| code.to_ascii_lowercase())
            .and_then(|code| self.bundles.get_key_value(code.as_str()).map(|(key, _)| key.as_str()))
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Get a message in the user's language, falling back to English
    pub fn get_message(&self, key: &str, language_code: Option<&str>, args: Option<&FluentArgs>) -> String {
        let language = self.resolve_language(language_code);

        let Some(bundle) = self.bundles.get(language).or_else(|| self.bundles.get(DEFAULT_LANGUAGE)) else {
            return format!("Missing translation: {key}");
        };

        let message = match bundle.get_message(key) {
            Some(message) => message,
            None if language != DEFAULT_LANGUAGE => {
                return self.get_message(key, Some(DEFAULT_LANGUAGE), args);
            }
            None => return format!("Missing translation: {key}"),
        };

        let Some(pattern) = message.value() else {
            return format!("Missing value for key: {key}");
        };

        let mut errors = Vec::new();
        let value = bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(key = %key, errors = ?errors, "Errors while formatting message");
        }
        value.into_owned()
    }

    /// Get a message without arguments
    pub fn t_lang(&self, key: &str, language_code: Option<&str>) -> String {
        self.get_message(key, language_code, None)
    }

    /// Get a message with simple string arguments
    pub fn t_args_lang(&self, key: &str, args: &[(&str, &str)], language_code: Option<&str>) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, FluentValue::from(*value));
        }
        self.get_message(key, language_code, Some(&fluent_args))
    }
}
