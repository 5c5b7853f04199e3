use anyhow::{Context, Result};
use recipe_carbs::analysis_config::AppConfig;
use recipe_carbs::bot::{self, BotContext};
use recipe_carbs::localization::LocalizationManager;
use recipe_carbs::nutrition_client::NutritionixClient;
use recipe_carbs::recipe_analyzer::RecipeAnalyzer;
use recipe_carbs::text_generation::OpenAiClient;
use std::env;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.json_logs);

    info!("Starting Recipe Carbs Telegram Bot");

    // Get bot token from environment
    let bot_token = env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

    let localization = LocalizationManager::load(&config.locales_dir)
        .with_context(|| format!("Failed to load locales from {}", config.locales_dir))?;

    let generator = OpenAiClient::new(config.text_service.clone())?;
    let nutrition = NutritionixClient::new(config.nutrition_service.clone())?;
    let analyzer = RecipeAnalyzer::from_services(Arc::new(generator), Arc::new(nutrition));

    let context = Arc::new(BotContext {
        analyzer: Arc::new(analyzer),
        localization: Arc::new(localization),
        min_recipe_length: config.min_recipe_length,
    });

    let bot = Bot::new(bot_token);

    info!(model = %config.text_service.model, "Bot initialized, starting dispatcher");

    let handler = dptree::entry().branch(Update::filter_message().endpoint(bot::message_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![context])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
