//! SQLite-backed conversation state: survives a "restart" (a second store
//! over the same database) and keeps the replace-unconditionally semantics.

mod common;

use std::sync::Arc;

use common::TestBot;
use piggybot::processing::{Extra, Flow, Process, ProcessStore, SqliteProcessStore};
use pretty_assertions::assert_eq;

const CHAT: i64 = 42;

#[tokio::test]
async fn test_sqlite_store_round_trips_across_reopen() {
    let bot = TestBot::new();
    let bank = bot.seed_bank(CHAT, "Vacation", 100);

    let store = SqliteProcessStore::new(Arc::clone(&bot.pool));
    let process = Process {
        chat: CHAT,
        flow: Flow::Income,
        step: 1,
        extra: Extra {
            bank: Some(bank),
            amount: None,
            keyboard: vec!["Vacation".to_string()],
        },
    };
    store.set(process.clone()).await.unwrap();

    // A new store over the same pool is what a restarted bot sees.
    let reopened = SqliteProcessStore::new(Arc::clone(&bot.pool));
    let loaded = reopened.get(CHAT).await.unwrap().unwrap();
    assert_eq!(loaded, process);
}

#[tokio::test]
async fn test_sqlite_store_set_replaces_and_clear_removes() {
    let bot = TestBot::new();
    let store = SqliteProcessStore::new(Arc::clone(&bot.pool));

    store.set(Process::new(CHAT, Flow::Income)).await.unwrap();
    store.set(Process::new(CHAT, Flow::CreateBank)).await.unwrap();

    let current = store.get(CHAT).await.unwrap().unwrap();
    assert_eq!(current.flow, Flow::CreateBank);
    assert_eq!(current.step, 0);

    store.clear(CHAT).await.unwrap();
    assert!(store.get(CHAT).await.unwrap().is_none());

    // Clearing an absent process is a no-op, not an error.
    store.clear(CHAT).await.unwrap();
}

#[tokio::test]
async fn test_sqlite_store_isolates_chats() {
    let bot = TestBot::new();
    let store = SqliteProcessStore::new(Arc::clone(&bot.pool));

    store.set(Process::new(1, Flow::Expense)).await.unwrap();
    store.set(Process::new(2, Flow::GetBalance)).await.unwrap();
    store.clear(1).await.unwrap();

    assert!(store.get(1).await.unwrap().is_none());
    assert_eq!(store.get(2).await.unwrap().unwrap().flow, Flow::GetBalance);
}
