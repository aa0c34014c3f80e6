//! Dispatcher schema and handler chain builders

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::processing::Router;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub router: Arc<Router>,
}

impl HandlerDeps {
    pub fn new(router: Arc<Router>) -> Self {
        Self { router }
    }
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in integration tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry().branch(message_handler(deps))
}

/// Handler for text messages: every command and every flow reply goes through
/// the router; the router owns user-facing error behavior, so a failure here
/// is only logged.
fn message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message().endpoint(move |msg: Message| {
        let deps = deps.clone();
        async move {
            if let Some(text) = msg.text() {
                log::debug!("chat {}: handling message", msg.chat.id);
                if let Err(err) = deps.router.handle(msg.chat.id.0, text).await {
                    log::error!("chat {}: failed to handle message: {}", msg.chat.id, err);
                }
            }
            Ok(())
        }
    })
}
