//! # Recipe Carbs Telegram Bot
//!
//! A Telegram bot that reads free-text recipes, extracts their ingredients in
//! grams through a text-generation service, looks up nutrition facts, and
//! replies with the carbohydrates per ingredient and for the whole dish.

pub mod analysis_config;
pub mod analysis_errors;
pub mod bot;
pub mod ingredient_model;
pub mod ingredient_parser;
pub mod localization;
pub mod nutrition_calculator;
pub mod nutrition_client;
pub mod recipe_analyzer;
pub mod response_formatter;
pub mod text_generation;
