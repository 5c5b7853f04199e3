//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::localization::LocalizationManager;
use crate::recipe_analyzer::{analyze_supervised, RecipeAnalyzer};

use super::ui_builder::{format_help_message, format_too_short_message, format_welcome_message};

/// Shared, read-only state handed to every message handler
pub struct BotContext {
    pub analyzer: Arc<RecipeAnalyzer>,
    pub localization: Arc<LocalizationManager>,
    /// Minimum message length, in characters, accepted as a recipe
    pub min_recipe_length: usize,
}

/// Whether a text message is long enough to be sent for analysis
pub fn is_recipe_candidate(text: &str, min_length: usize) -> bool {
    text.trim().chars().count() >= min_length
}

/// Command word of a message with any `@botname` suffix removed,
/// `None` when the message is not a command
pub fn command_name(text: &str) -> Option<&str> {
    let word = text.split_whitespace().next()?;
    if !word.starts_with('/') {
        return None;
    }
    word.split('@').next()
}

async fn handle_text_message(bot: &Bot, msg: &Message, text: &str, context: &Arc<BotContext>) -> Result<()> {
    debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());
    let localization = &context.localization;

    match command_name(text) {
        Some("/start") => {
            bot.send_message(msg.chat.id, format_welcome_message(localization, language_code))
                .await?;
            return Ok(());
        }
        Some("/help") => {
            bot.send_message(msg.chat.id, format_help_message(localization, language_code))
                .await?;
            return Ok(());
        }
        _ => {}
    }

    if !is_recipe_candidate(text, context.min_recipe_length) {
        info!(user_id = %msg.chat.id, message_length = text.len(), "Rejected message too short for a recipe");
        bot.send_message(
            msg.chat.id,
            format_too_short_message(localization, context.min_recipe_length, language_code),
        )
        .await?;
        return Ok(());
    }

    // Acknowledge before the slow analysis starts
    if let Err(e) = bot
        .send_message(msg.chat.id, localization.t_lang("analysis-started", language_code))
        .await
    {
        error!(user_id = %msg.chat.id, error = %e, "Failed to send acknowledgment");
        return Ok(());
    }

    let span = info_span!("recipe_analysis", user_id = %msg.chat.id);
    tokio::spawn(
        deliver_analysis(
            bot.clone(),
            msg.chat.id,
            Arc::clone(context),
            text.to_string(),
            language_code.map(str::to_string),
        )
        .instrument(span),
    );

    Ok(())
}

/// Analyze the recipe and send the report, or the generic failure message
async fn deliver_analysis(
    bot: Bot,
    chat_id: ChatId,
    context: Arc<BotContext>,
    recipe_text: String,
    language_code: Option<String>,
) {
    let outcome = analyze_supervised(Arc::clone(&context.analyzer), recipe_text).await;

    let sent = match outcome {
        Ok(report) => {
            bot.send_message(chat_id, report)
                .parse_mode(ParseMode::MarkdownV2)
                .await
        }
        Err(e) => {
            warn!(user_id = %chat_id, error = %e, "Failed to analyze the recipe request");
            bot.send_message(
                chat_id,
                context
                    .localization
                    .t_lang("analysis-failed", language_code.as_deref()),
            )
            .await
        }
    };

    if let Err(e) = sent {
        error!(user_id = %chat_id, error = %e, "Failed to send analysis result");
    }
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message, context: &BotContext) -> Result<()> {
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());

    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");

    bot.send_message(
        msg.chat.id,
        context.localization.t_lang("unsupported-message", language_code),
    )
    .await?;
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, context: Arc<BotContext>) -> Result<()> {
    match msg.text() {
        Some(text) => handle_text_message(&bot, &msg, text, &context).await?,
        None => handle_unsupported_message(&bot, &msg, &context).await?,
    }

    Ok(())
}
