//! Bot module for handling Telegram interactions
//!
//! - `message_handler`: Handles incoming messages and dispatches recipe analyses
//! - `ui_builder`: Composes the informational messages

pub mod message_handler;
pub mod ui_builder;

// Re-export main handler function for use in main.rs
pub use message_handler::{command_name, is_recipe_candidate, message_handler, BotContext};
