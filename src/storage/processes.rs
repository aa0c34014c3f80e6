//! Row-level access to the `processes` table.
//!
//! Only the SQLite-backed process store uses this; the flow/step/extra
//! semantics live in `processing`, this module just moves rows.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::core::error::AppResult;

/// One persisted conversation state row. `extra` is opaque JSON here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRow {
    pub chat: i64,
    pub flow: String,
    pub step: u32,
    pub extra: String,
}

pub fn load_process(conn: &Connection, chat: i64) -> AppResult<Option<ProcessRow>> {
    let mut stmt = conn.prepare("SELECT chat, flow, step, extra FROM processes WHERE chat = ?1")?;
    let row = stmt
        .query_row(&[&chat as &dyn rusqlite::ToSql], |row| {
            Ok(ProcessRow {
                chat: row.get(0)?,
                flow: row.get(1)?,
                step: row.get(2)?,
                extra: row.get(3)?,
            })
        })
        .optional()?;
    Ok(row)
}

/// Upserts the chat's row. A chat has at most one in-flight process, so the
/// primary key on `chat` makes the replace semantics free.
pub fn save_process(conn: &Connection, row: &ProcessRow) -> AppResult<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO processes (chat, flow, step, extra, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(chat) DO UPDATE SET flow = ?2, step = ?3, extra = ?4, updated_at = ?5",
        &[
            &row.chat as &dyn rusqlite::ToSql,
            &row.flow as &dyn rusqlite::ToSql,
            &row.step as &dyn rusqlite::ToSql,
            &row.extra as &dyn rusqlite::ToSql,
            &now as &dyn rusqlite::ToSql,
        ],
    )?;
    Ok(())
}

pub fn clear_process(conn: &Connection, chat: i64) -> AppResult<()> {
    conn.execute("DELETE FROM processes WHERE chat = ?1", &[&chat as &dyn rusqlite::ToSql])?;
    Ok(())
}
