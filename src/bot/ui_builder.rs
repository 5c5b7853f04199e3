//! UI Builder module for composing the bot's informational messages

use crate::localization::LocalizationManager;

/// Greeting sent for `/start`
pub fn format_welcome_message(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    format!(
        "👋 {}\n\n{}\n\n{}\n{}\n{}",
        localization.t_lang("welcome-title", language_code),
        localization.t_lang("welcome-description", language_code),
        localization.t_lang("welcome-commands", language_code),
        localization.t_lang("welcome-start", language_code),
        localization.t_lang("welcome-help", language_code)
    )
}

/// Usage instructions sent for `/help`
pub fn format_help_message(localization: &LocalizationManager, language_code: Option<&str>) -> String {
    [
        "help-title",
        "help-description",
        "help-step1",
        "help-step2",
        "help-step3",
        "help-tips",
    ]
    .iter()
    .map(|key| localization.t_lang(key, language_code))
    .collect::<Vec<_>>()
    .join("\n\n")
}

/// Prompt sent when a message is too short to be a recipe
pub fn format_too_short_message(
    localization: &LocalizationManager,
    min_length: usize,
    language_code: Option<&str>,
) -> String {
    let min_length = min_length.to_string();
    localization.t_args_lang("recipe-too-short", &[("min_length", min_length.as_str())], language_code)
}
