use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::{AppError, AppResult};

/// A named piggy bank owned by one chat/account.
///
/// `(account, name)` is unique. The balance is whole currency units, signed:
/// overdraft is allowed by the domain, so no floor is enforced anywhere.
/// Balances are only ever changed through [`adjust_balance`], never set
/// directly from user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub id: String,
    pub account: i64,
    pub name: String,
    pub balance: i64,
    pub created_at: String,
    pub updated_at: String,
}

fn bank_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Bank> {
    Ok(Bank {
        id: row.get(0)?,
        account: row.get(1)?,
        name: row.get(2)?,
        balance: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

const BANK_COLUMNS: &str = "id, account, name, balance, created_at, updated_at";

/// Finds a bank by `(account, name)`.
///
/// # Returns
///
/// The bank, or `AppError::BankNotFound` if no bank with that name exists on
/// the account.
pub fn find_bank(conn: &Connection, account: i64, name: &str) -> AppResult<Bank> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM banks WHERE account = ?1 AND name = ?2",
        BANK_COLUMNS
    ))?;
    let bank = stmt
        .query_row(
            &[&account as &dyn rusqlite::ToSql, &name as &dyn rusqlite::ToSql],
            bank_from_row,
        )
        .optional()?;

    bank.ok_or(AppError::BankNotFound)
}

/// Returns the names of all banks on the account, oldest first.
///
/// An empty account yields an empty vec; callers decide whether that is an
/// error (the router treats it as "nothing to choose from").
pub fn list_bank_names(conn: &Connection, account: i64) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM banks WHERE account = ?1 ORDER BY created_at, name")?;
    let rows = stmt.query_map(&[&account as &dyn rusqlite::ToSql], |row| row.get(0))?;

    let mut names = Vec::new();
    for row in rows {
        names.push(row?);
    }
    Ok(names)
}

/// Creates a bank with a zero balance.
///
/// # Returns
///
/// The new bank, or `AppError::DuplicateBankName` if `(account, name)` is
/// already taken (enforced by the UNIQUE constraint, so two concurrent
/// creations can't both succeed).
pub fn create_bank(conn: &Connection, account: i64, name: &str) -> AppResult<Bank> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let inserted = conn.execute(
        "INSERT INTO banks (id, account, name, balance, created_at, updated_at) VALUES (?1, ?2, ?3, 0, ?4, ?4)",
        &[
            &id as &dyn rusqlite::ToSql,
            &account as &dyn rusqlite::ToSql,
            &name as &dyn rusqlite::ToSql,
            &now as &dyn rusqlite::ToSql,
        ],
    );

    match inserted {
        Ok(_) => Ok(Bank {
            id,
            account,
            name: name.to_string(),
            balance: 0,
            created_at: now.clone(),
            updated_at: now,
        }),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == rusqlite::ErrorCode::ConstraintViolation => {
            Err(AppError::DuplicateBankName)
        }
        Err(err) => Err(err.into()),
    }
}

/// Deletes a bank by `(account, name)`.
///
/// Historical operations referencing the bank are kept: the ledger is
/// append-only and destruction does not cascade.
///
/// # Returns
///
/// `Ok(())`, or `AppError::BankNotFound` if nothing was deleted.
pub fn delete_bank(conn: &Connection, account: i64, name: &str) -> AppResult<()> {
    let deleted = conn.execute(
        "DELETE FROM banks WHERE account = ?1 AND name = ?2",
        &[&account as &dyn rusqlite::ToSql, &name as &dyn rusqlite::ToSql],
    )?;

    if deleted == 0 {
        return Err(AppError::BankNotFound);
    }
    Ok(())
}

/// Applies a signed delta to a bank's balance.
///
/// A single `UPDATE ... SET balance = balance + ?` statement, so two
/// concurrent adjustments against the same bank can't lose an update: SQLite
/// serializes the statement and both deltas land.
///
/// # Returns
///
/// The updated bank, or `AppError::BankNotFound` if the id does not exist
/// (e.g. the bank was destroyed mid-flow).
pub fn adjust_balance(conn: &Connection, bank_id: &str, delta: i64) -> AppResult<Bank> {
    let now = Utc::now().to_rfc3339();

    let updated = conn.execute(
        "UPDATE banks SET balance = balance + ?1, updated_at = ?2 WHERE id = ?3",
        &[
            &delta as &dyn rusqlite::ToSql,
            &now as &dyn rusqlite::ToSql,
            &bank_id as &dyn rusqlite::ToSql,
        ],
    )?;

    if updated == 0 {
        return Err(AppError::BankNotFound);
    }

    let mut stmt = conn.prepare(&format!("SELECT {} FROM banks WHERE id = ?1", BANK_COLUMNS))?;
    let bank = stmt.query_row(&[&bank_id as &dyn rusqlite::ToSql], bank_from_row)?;
    Ok(bank)
}
