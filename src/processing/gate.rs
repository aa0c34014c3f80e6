use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Per-chat serialization gate.
///
/// The conversation state is read-modify-write, so two messages from the same
/// chat must never be handled concurrently (a webhook delivery can race). The
/// gate hands out one mutex per chat; different chats proceed in parallel.
#[derive(Clone, Default)]
pub struct ChatGate {
    locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl ChatGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the chat's lock, creating it on first use. The guard is held
    /// for the whole handling of one message.
    pub async fn acquire(&self, chat: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(chat).or_insert_with(|| Arc::new(Mutex::new(()))))
        };
        lock.lock_owned().await
    }
}
