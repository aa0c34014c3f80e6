//! Telegram transport: bot construction, update dispatch, keyboards and the
//! Telegram-backed notifier. Everything conversational lives in `processing`;
//! this layer only adapts updates in and replies out.

pub mod bot;
pub mod handlers;
pub mod keyboard;
pub mod notifier;

pub use bot::{create_bot, setup_bot_commands};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use notifier::TelegramNotifier;

/// The bot type used across the crate.
pub type Bot = teloxide::Bot;
