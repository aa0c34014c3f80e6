use chrono::Utc;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::AppResult;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Income,
    Expense,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Income => "income",
            OperationKind::Expense => "expense",
        }
    }

    /// The delta this kind applies to a balance.
    pub fn signed(self, amount: i64) -> i64 {
        match self {
            OperationKind::Income => amount,
            OperationKind::Expense => -amount,
        }
    }
}

impl FromSql for OperationKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(OperationKind::Income),
            "expense" => Ok(OperationKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown operation kind in ledger: {other}").into(),
            )),
        }
    }
}

/// An immutable ledger entry recording one income or expense event against a
/// bank. Never updated or deleted once written; `bank` references the bank by
/// id without a foreign key, so entries outlive their bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: String,
    pub account: i64,
    pub bank: String,
    pub operation: OperationKind,
    pub amount: i64,
    pub comment: String,
    pub created_at: String,
}

/// The caller-supplied part of a new ledger entry.
#[derive(Debug, Clone)]
pub struct NewOperation<'a> {
    pub account: i64,
    pub bank: &'a str,
    pub kind: OperationKind,
    pub amount: i64,
    pub comment: &'a str,
}

/// Appends one entry to the ledger.
///
/// Never fails on domain grounds, only on infrastructure errors.
pub fn record_operation(conn: &Connection, new: &NewOperation<'_>) -> AppResult<Operation> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let kind = new.kind.as_str();

    conn.execute(
        "INSERT INTO operations (id, account, bank, operation, amount, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        &[
            &id as &dyn rusqlite::ToSql,
            &new.account as &dyn rusqlite::ToSql,
            &new.bank as &dyn rusqlite::ToSql,
            &kind as &dyn rusqlite::ToSql,
            &new.amount as &dyn rusqlite::ToSql,
            &new.comment as &dyn rusqlite::ToSql,
            &now as &dyn rusqlite::ToSql,
        ],
    )?;

    Ok(Operation {
        id,
        account: new.account,
        bank: new.bank.to_string(),
        operation: new.kind,
        amount: new.amount,
        comment: new.comment.to_string(),
        created_at: now,
    })
}

/// Returns the ledger entries recorded against a bank id, oldest first.
///
/// Entries survive the destruction of their bank, so this works for orphaned
/// history too.
pub fn list_operations(conn: &Connection, account: i64, bank_id: &str) -> AppResult<Vec<Operation>> {
    let mut stmt = conn.prepare(
        "SELECT id, account, bank, operation, amount, comment, created_at
         FROM operations WHERE account = ?1 AND bank = ?2 ORDER BY created_at, id",
    )?;
    let rows = stmt.query_map(
        &[&account as &dyn rusqlite::ToSql, &bank_id as &dyn rusqlite::ToSql],
        |row| {
            Ok(Operation {
                id: row.get(0)?,
                account: row.get(1)?,
                bank: row.get(2)?,
                operation: row.get(3)?,
                amount: row.get(4)?,
                comment: row.get(5)?,
                created_at: row.get(6)?,
            })
        },
    )?;

    let mut operations = Vec::new();
    for row in rows {
        operations.push(row?);
    }
    Ok(operations)
}
