//! Transactional compositions over banks and operations.
//!
//! Every balance mutation goes through here: the ledger entry and the balance
//! adjustment commit in one SQLite transaction, so a crash between the two
//! writes can't leave an operation without its balance change or vice versa.

use rusqlite::Connection;

use crate::core::error::AppResult;
use crate::storage::banks::{self, Bank};
use crate::storage::operations::{self, NewOperation, Operation, OperationKind};

/// Applies one income or expense to a bank.
///
/// Records the ledger entry first, then adjusts the balance; both inside one
/// transaction. Returns the updated bank and the recorded entry.
pub fn apply_operation(
    conn: &mut Connection,
    account: i64,
    bank: &Bank,
    kind: OperationKind,
    amount: i64,
    comment: &str,
) -> AppResult<(Bank, Operation)> {
    let tx = conn.transaction()?;

    let operation = operations::record_operation(
        &tx,
        &NewOperation {
            account,
            bank: &bank.id,
            kind,
            amount,
            comment,
        },
    )?;
    let updated = banks::adjust_balance(&tx, &bank.id, kind.signed(amount))?;

    tx.commit()?;
    Ok((updated, operation))
}

/// Moves `amount` between two banks of the same account.
///
/// The expense leg on the source and the income leg on the destination (two
/// ledger entries, two balance adjustments) commit atomically: either both
/// banks change and `source + destination` is conserved, or nothing is
/// written. Callers must resolve and validate the destination *before*
/// calling; by the time we're here the transfer is decided.
pub fn apply_transfer(
    conn: &mut Connection,
    account: i64,
    source: &Bank,
    destination: &Bank,
    amount: i64,
) -> AppResult<(Bank, Bank)> {
    let tx = conn.transaction()?;

    operations::record_operation(
        &tx,
        &NewOperation {
            account,
            bank: &source.id,
            kind: OperationKind::Expense,
            amount,
            comment: &format!("transfer to {}", destination.name),
        },
    )?;
    let updated_source = banks::adjust_balance(&tx, &source.id, -amount)?;

    operations::record_operation(
        &tx,
        &NewOperation {
            account,
            bank: &destination.id,
            kind: OperationKind::Income,
            amount,
            comment: &format!("transfer from {}", source.name),
        },
    )?;
    let updated_destination = banks::adjust_balance(&tx, &destination.id, amount)?;

    tx.commit()?;
    Ok((updated_source, updated_destination))
}
