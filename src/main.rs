use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::{webhooks, Polling};

use piggybot::cli::{Cli, Commands};
use piggybot::core::{config, init_logger};
use piggybot::processing::{process_store_from_config, Router};
use piggybot::storage::create_pool;
use piggybot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramNotifier};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up global panic handler to catch panics in dispatcher
    // This allows us to log the panic and continue working instead of terminating
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env before any config static is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        None => {
            // No command specified - default to running the bot in polling mode
            log::info!("No command specified, running bot in default mode");
            run_bot(false).await
        }
    }
}

/// Wires storage, conversation state and transport together, then dispatches
/// updates until shutdown.
async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");

    // Database pool (runs migrations) and conversation-state backend
    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    let processes = process_store_from_config(&db_pool);

    // Create bot instance
    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}. Continuing anyway.", e);
    }

    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let router = Arc::new(Router::new(Arc::clone(&db_pool), processes, notifier));

    // Create the dispatcher handler tree using the modular schema
    let handler = schema(HandlerDeps::new(router));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler).enable_ctrlc_handler().build();

    if use_webhook {
        // Webhook mode
        let url: url::Url = config::WEBHOOK_URL
            .clone()
            .ok_or_else(|| anyhow::anyhow!("WEBHOOK_URL must be set in webhook mode"))?
            .parse()?;
        let addr = SocketAddr::from(([0, 0, 0, 0], *config::PORT));
        log::info!("Starting bot in webhook mode: {} -> {}", addr, url);

        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to set up webhook listener: {}", e))?;

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        // Long polling mode (default)
        log::info!("Starting bot in long polling mode");

        // Drop updates that queued up while the bot was down; replaying a
        // half-finished conversation against fresh state confuses users.
        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

        dispatcher
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    }

    Ok(())
}
