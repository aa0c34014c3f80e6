//! Conversation-state stores.
//!
//! One in-flight [`Process`] per chat with get/set/clear semantics. With the
//! in-memory backend, state dies with the process; the SQLite backend keeps
//! conversations across restarts. Selected at startup via the PROCESS_STORE
//! configuration.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::processing::{Extra, Flow, Process};
use crate::storage::db::DbPool;
use crate::storage::processes::{self, ProcessRow};
use crate::storage::get_connection;

/// Keyed store for the single in-flight process per chat.
#[async_trait]
pub trait ProcessStore: Send + Sync {
    async fn get(&self, chat: i64) -> AppResult<Option<Process>>;

    /// Replaces any existing process for the chat unconditionally.
    async fn set(&self, process: Process) -> AppResult<()>;

    async fn clear(&self, chat: i64) -> AppResult<()>;
}

/// In-memory store. Cross-chat isolation is total: the map is keyed by chat
/// and the router serializes access per chat, so the single mutex is never
/// contended for long.
#[derive(Default)]
pub struct MemoryProcessStore {
    processes: Mutex<HashMap<i64, Process>>,
}

impl MemoryProcessStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProcessStore for MemoryProcessStore {
    async fn get(&self, chat: i64) -> AppResult<Option<Process>> {
        let processes = self.processes.lock().await;
        Ok(processes.get(&chat).cloned())
    }

    async fn set(&self, process: Process) -> AppResult<()> {
        let mut processes = self.processes.lock().await;
        processes.insert(process.chat, process);
        Ok(())
    }

    async fn clear(&self, chat: i64) -> AppResult<()> {
        let mut processes = self.processes.lock().await;
        processes.remove(&chat);
        Ok(())
    }
}

/// SQLite-backed store: in-flight conversations survive restarts and deploys.
pub struct SqliteProcessStore {
    pool: Arc<DbPool>,
}

impl SqliteProcessStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessStore for SqliteProcessStore {
    async fn get(&self, chat: i64) -> AppResult<Option<Process>> {
        let conn = get_connection(&self.pool)?;
        let row = match processes::load_process(&conn, chat)? {
            Some(row) => row,
            None => return Ok(None),
        };

        let flow = match Flow::parse(&row.flow) {
            Some(flow) => flow,
            None => {
                // A row written by a newer or older build; dropping it is
                // safer than guessing what flow the user was in.
                log::warn!("discarding process for chat {} with unknown flow {:?}", chat, row.flow);
                processes::clear_process(&conn, chat)?;
                return Ok(None);
            }
        };
        let extra: Extra = serde_json::from_str(&row.extra).map_err(AppError::ProcessState)?;

        Ok(Some(Process {
            chat: row.chat,
            flow,
            step: row.step,
            extra,
        }))
    }

    async fn set(&self, process: Process) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;
        let row = ProcessRow {
            chat: process.chat,
            flow: process.flow.as_str().to_string(),
            step: process.step,
            extra: serde_json::to_string(&process.extra).map_err(AppError::ProcessState)?,
        };
        processes::save_process(&conn, &row)
    }

    async fn clear(&self, chat: i64) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;
        processes::clear_process(&conn, chat)
    }
}

/// Builds the process store selected by PROCESS_STORE.
pub fn process_store_from_config(pool: &Arc<DbPool>) -> Arc<dyn ProcessStore> {
    match config::PROCESS_STORE.as_str() {
        "sqlite" => {
            log::info!("Using SQLite-backed conversation state");
            Arc::new(SqliteProcessStore::new(Arc::clone(pool)))
        }
        other => {
            if other != "memory" {
                log::warn!("Unknown PROCESS_STORE {:?}, falling back to in-memory", other);
            }
            Arc::new(MemoryProcessStore::new())
        }
    }
}
