//! Shared helpers for integration tests: a recording notifier and a router
//! wired to a scratch database.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::Mutex;

use piggybot::core::AppResult;
use piggybot::processing::{MemoryProcessStore, Notifier, Router};
use piggybot::storage::banks;
use piggybot::storage::{create_pool, get_connection, DbConnection, DbPool};

/// One outbound message captured by the mock notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat: i64,
    pub text: String,
    /// Quick-reply options, `None` for plain sends.
    pub choices: Option<Vec<String>>,
}

/// Records every outbound message instead of talking to Telegram.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn last(&self) -> SentMessage {
        self.messages.lock().await.last().cloned().expect("no messages sent")
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, chat: i64, text: &str) -> AppResult<()> {
        self.messages.lock().await.push(SentMessage {
            chat,
            text: text.to_string(),
            choices: None,
        });
        Ok(())
    }

    async fn send_with_choices(&self, chat: i64, text: &str, choices: &[String]) -> AppResult<()> {
        self.messages.lock().await.push(SentMessage {
            chat,
            text: text.to_string(),
            choices: Some(choices.to_vec()),
        });
        Ok(())
    }
}

/// A full bot minus the transport: router + scratch SQLite + in-memory
/// conversation state + recording notifier.
pub struct TestBot {
    pub router: Router,
    pub notifier: Arc<RecordingNotifier>,
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

impl TestBot {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("piggybot-test.sqlite");
        let pool = Arc::new(create_pool(path.to_str().expect("utf-8 temp path")).expect("create pool"));
        let notifier = Arc::new(RecordingNotifier::new());
        let router = Router::new(
            Arc::clone(&pool),
            Arc::new(MemoryProcessStore::new()),
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        );

        Self {
            router,
            notifier,
            pool,
            _dir: dir,
        }
    }

    /// Drives one user message through the router.
    pub async fn say(&self, chat: i64, text: &str) {
        self.router.handle(chat, text).await.expect("router.handle failed");
    }

    pub fn conn(&self) -> DbConnection {
        get_connection(&self.pool).expect("get connection")
    }

    /// Creates a bank directly in storage, optionally with a starting balance.
    pub fn seed_bank(&self, chat: i64, name: &str, balance: i64) -> banks::Bank {
        let conn = self.conn();
        let bank = banks::create_bank(&conn, chat, name).expect("seed bank");
        if balance != 0 {
            banks::adjust_balance(&conn, &bank.id, balance).expect("seed balance")
        } else {
            bank
        }
    }

    pub fn balance_of(&self, chat: i64, name: &str) -> i64 {
        let conn = self.conn();
        banks::find_bank(&conn, chat, name).expect("bank exists").balance
    }
}
