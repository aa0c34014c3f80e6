//! Classifies inbound messages and dispatches them.
//!
//! A message is either an exact top-level command token (which always
//! pre-empts whatever flow is in progress) or a continuation of the chat's
//! active process. Infrastructure failures surface here: the router owns the
//! apology message and the process cleanup, the layers below only return
//! typed errors.

use std::sync::Arc;

use crate::core::error::{AppError, AppResult};
use crate::processing::flows;
use crate::processing::gate::ChatGate;
use crate::processing::notifier::Notifier;
use crate::processing::store::ProcessStore;
use crate::processing::texts;
use crate::processing::Flow;
use crate::storage::db::DbPool;

/// A recognized top-level command token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopCommand {
    Start,
    Cancel,
    Begin(Flow),
}

/// Exact-match classification of a message as a top-level command.
///
/// Anything else, including command-looking text with trailing arguments,
/// is flow input.
pub fn top_command(text: &str) -> Option<TopCommand> {
    match text.trim() {
        "/start" => Some(TopCommand::Start),
        "/cancel" => Some(TopCommand::Cancel),
        "/create_bank" => Some(TopCommand::Begin(Flow::CreateBank)),
        "/destroy_bank" => Some(TopCommand::Begin(Flow::DestroyBank)),
        "/get_balance" => Some(TopCommand::Begin(Flow::GetBalance)),
        "/income" => Some(TopCommand::Begin(Flow::Income)),
        "/expense" => Some(TopCommand::Begin(Flow::Expense)),
        "/create_transfer" => Some(TopCommand::Begin(Flow::CreateTransfer)),
        _ => None,
    }
}

/// The message router. One instance serves every chat; all per-chat state
/// lives in the process store.
pub struct Router {
    pub(crate) pool: Arc<DbPool>,
    pub(crate) processes: Arc<dyn ProcessStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    gate: ChatGate,
}

impl Router {
    pub fn new(pool: Arc<DbPool>, processes: Arc<dyn ProcessStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            pool,
            processes,
            notifier,
            gate: ChatGate::new(),
        }
    }

    /// Handles one inbound message, serialized per chat.
    ///
    /// User-input problems never escape the flows; any error that reaches
    /// this level is infrastructure. Those abort the flow: log with full
    /// detail, clear the process, apologize to the user in one short line.
    pub async fn handle(&self, chat: i64, text: &str) -> AppResult<()> {
        let _guard = self.gate.acquire(chat).await;

        if let Err(err) = self.dispatch(chat, text).await {
            if matches!(err, AppError::Telegram(_)) {
                // The transport itself failed; there is nobody to apologize to.
                return Err(err);
            }

            log::error!("chat {}: flow aborted: {}", chat, err);
            if let Err(clear_err) = self.processes.clear(chat).await {
                log::error!("chat {}: failed to clear process after abort: {}", chat, clear_err);
            }
            self.notifier.send(chat, texts::UNEXPECTED_ERROR).await?;
        }
        Ok(())
    }

    async fn dispatch(&self, chat: i64, text: &str) -> AppResult<()> {
        if let Some(command) = top_command(text) {
            log::info!("chat {}: top-level command {:?}", chat, command);
            return match command {
                TopCommand::Start => flows::start(self, chat).await,
                TopCommand::Cancel => flows::cancel(self, chat).await,
                TopCommand::Begin(flow) => flows::begin(self, chat, flow).await,
            };
        }

        match self.processes.get(chat).await? {
            Some(process) => flows::advance(self, process, text).await,
            None => self.notifier.send(chat, texts::HELP).await,
        }
    }
}
