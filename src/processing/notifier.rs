use async_trait::async_trait;

use crate::core::error::AppResult;

/// Outbound messages to the user.
///
/// The state machine only ever needs two shapes: plain text, and text with a
/// flat list of quick-reply options the transport renders as tappable
/// buttons. The Telegram implementation lives in `telegram::notifier`; tests
/// substitute a recording mock.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends plain text, clearing any quick-reply options left from a
    /// previous prompt.
    async fn send(&self, chat: i64, text: &str) -> AppResult<()>;

    /// Sends text with quick-reply options (bank names).
    async fn send_with_choices(&self, chat: i64, text: &str, choices: &[String]) -> AppResult<()>;
}
