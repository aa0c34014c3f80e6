//! Step handlers for the six conversational flows.
//!
//! Flows only mutate the ledger at their final step, after every input has
//! been collected and validated. Until then `/cancel` (and any other
//! top-level command) can discard the process with nothing to roll back.
//! Malformed input re-prompts the same step with the working data intact;
//! only infrastructure errors propagate out to the router.

use anyhow::anyhow;

use crate::core::error::{AppError, AppResult};
use crate::processing::router::Router;
use crate::processing::texts;
use crate::processing::{Extra, Flow, Process};
use crate::storage::banks::{self, Bank};
use crate::storage::get_connection;
use crate::storage::ledger;
use crate::storage::operations::OperationKind;

/// `/start`: onboard an empty account straight into bank creation, otherwise
/// show the command listing.
pub(crate) async fn start(router: &Router, chat: i64) -> AppResult<()> {
    router.processes.clear(chat).await?;

    let names = {
        let conn = get_connection(&router.pool)?;
        banks::list_bank_names(&conn, chat)?
    };

    if names.is_empty() {
        router.notifier.send(chat, texts::ONBOARDING).await?;
        router.processes.set(Process::new(chat, Flow::CreateBank)).await?;
    } else {
        router.notifier.send(chat, texts::HELP).await?;
    }
    Ok(())
}

/// `/cancel`: drop whatever was in progress and reply neutrally.
pub(crate) async fn cancel(router: &Router, chat: i64) -> AppResult<()> {
    router.processes.clear(chat).await?;
    router.notifier.send(chat, texts::CANCELLED).await
}

/// Begins a flow at step 0, discarding any process already in flight.
pub(crate) async fn begin(router: &Router, chat: i64, flow: Flow) -> AppResult<()> {
    router.processes.clear(chat).await?;

    if flow == Flow::CreateBank {
        router.notifier.send(chat, texts::PROMPT_NEW_BANK_NAME).await?;
        router.processes.set(Process::new(chat, flow)).await?;
        return Ok(());
    }

    // Every other flow opens with a bank choice; an empty account has
    // nothing to choose from, so no process is created at all.
    let names = {
        let conn = get_connection(&router.pool)?;
        banks::list_bank_names(&conn, chat)?
    };
    if names.is_empty() {
        router.notifier.send(chat, texts::NO_BANKS).await?;
        return Ok(());
    }

    let prompt = match flow {
        Flow::DestroyBank => texts::PROMPT_BANK_TO_DESTROY,
        Flow::GetBalance => texts::PROMPT_BANK_FOR_BALANCE,
        Flow::CreateTransfer => texts::PROMPT_TRANSFER_SOURCE,
        _ => texts::PROMPT_BANK_FOR_OPERATION,
    };
    router.notifier.send_with_choices(chat, prompt, &names).await?;

    let mut process = Process::new(chat, flow);
    process.extra.keyboard = names;
    router.processes.set(process).await?;
    Ok(())
}

/// Continues the chat's in-flight flow with one more reply, keyed by
/// `(flow, step)`.
pub(crate) async fn advance(router: &Router, process: Process, text: &str) -> AppResult<()> {
    match (process.flow, process.step) {
        (Flow::CreateBank, 0) => create_bank(router, process, text).await,
        (Flow::DestroyBank, 0) => destroy_bank(router, process, text).await,
        (Flow::GetBalance, 0) => get_balance(router, process, text).await,
        (Flow::Income, 0) | (Flow::Expense, 0) => choose_operation_bank(router, process, text).await,
        (Flow::Income, 1) | (Flow::Expense, 1) => collect_amount(router, process, text).await,
        (Flow::Income, 2) | (Flow::Expense, 2) => finish_operation(router, process, text).await,
        (Flow::CreateTransfer, 0) => choose_transfer_source(router, process, text).await,
        (Flow::CreateTransfer, 1) => collect_transfer_amount(router, process, text).await,
        (Flow::CreateTransfer, 2) => finish_transfer(router, process, text).await,
        (flow, step) => Err(AppError::Anyhow(anyhow!(
            "process for chat {} at impossible step {}/{}",
            process.chat,
            flow.as_str(),
            step
        ))),
    }
}

/// Whole non-negative units only. Rejects negatives: an expense of -5 would
/// silently become an income.
fn parse_amount(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok().filter(|amount| *amount >= 0)
}

/// Resolves a bank chosen at a "pick a bank" step. An unknown name re-shows
/// the same option list and returns `None`; the step does not advance and
/// the process is untouched.
async fn resolve_chosen_bank(router: &Router, process: &Process, name: &str) -> AppResult<Option<Bank>> {
    let found = {
        let conn = get_connection(&router.pool)?;
        banks::find_bank(&conn, process.chat, name.trim())
    };

    match found {
        Ok(bank) => Ok(Some(bank)),
        Err(AppError::BankNotFound) => {
            router
                .notifier
                .send_with_choices(process.chat, texts::BANK_NOT_FOUND, &process.extra.keyboard)
                .await?;
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// create_bank, step 0: the reply is the new bank's name.
async fn create_bank(router: &Router, process: Process, text: &str) -> AppResult<()> {
    let name = text.trim();
    if name.is_empty() {
        return router.notifier.send(process.chat, texts::PROMPT_NEW_BANK_NAME).await;
    }

    let created = {
        let conn = get_connection(&router.pool)?;
        banks::create_bank(&conn, process.chat, name)
    };

    match created {
        Ok(bank) => {
            log::info!("chat {}: created bank {:?}", process.chat, bank.name);
            router.processes.clear(process.chat).await?;
            router.notifier.send(process.chat, texts::BANK_CREATED).await
        }
        Err(AppError::DuplicateBankName) => {
            // Stay at step 0; the next message is another name attempt.
            router.notifier.send(process.chat, texts::BANK_NAME_TAKEN).await
        }
        Err(err) => Err(err),
    }
}

/// destroy_bank, step 0: the reply names the bank to delete.
async fn destroy_bank(router: &Router, process: Process, text: &str) -> AppResult<()> {
    let Some(bank) = resolve_chosen_bank(router, &process, text).await? else {
        return Ok(());
    };

    {
        let conn = get_connection(&router.pool)?;
        banks::delete_bank(&conn, process.chat, &bank.name)?;
    }

    log::info!("chat {}: destroyed bank {:?}", process.chat, bank.name);
    router.processes.clear(process.chat).await?;
    router.notifier.send(process.chat, texts::BANK_DESTROYED).await
}

/// get_balance, step 0: read-only, no ledger mutation.
async fn get_balance(router: &Router, process: Process, text: &str) -> AppResult<()> {
    let Some(bank) = resolve_chosen_bank(router, &process, text).await? else {
        return Ok(());
    };

    router.processes.clear(process.chat).await?;
    router
        .notifier
        .send(process.chat, &texts::balance(&bank.name, bank.balance))
        .await
}

/// income/expense, step 0: remember the chosen bank, ask for the amount.
async fn choose_operation_bank(router: &Router, mut process: Process, text: &str) -> AppResult<()> {
    let Some(bank) = resolve_chosen_bank(router, &process, text).await? else {
        return Ok(());
    };

    router.notifier.send(process.chat, texts::PROMPT_AMOUNT).await?;

    process.step = 1;
    process.extra = Extra {
        bank: Some(bank),
        ..Extra::default()
    };
    router.processes.set(process).await
}

/// income/expense, step 1: parse the amount, ask for a comment.
async fn collect_amount(router: &Router, mut process: Process, text: &str) -> AppResult<()> {
    let Some(amount) = parse_amount(text) else {
        // Stay at step 1 with the selected bank intact.
        return router.notifier.send(process.chat, texts::INVALID_AMOUNT).await;
    };

    router.notifier.send(process.chat, texts::PROMPT_COMMENT).await?;

    process.step = 2;
    process.extra.amount = Some(amount);
    router.processes.set(process).await
}

/// income/expense, step 2: the reply is the comment: commit the operation
/// and report the confirmed balance.
async fn finish_operation(router: &Router, process: Process, text: &str) -> AppResult<()> {
    let kind = match process.flow {
        Flow::Income => OperationKind::Income,
        _ => OperationKind::Expense,
    };
    let (bank, amount) = match (&process.extra.bank, process.extra.amount) {
        (Some(bank), Some(amount)) => (bank.clone(), amount),
        _ => {
            return Err(AppError::Anyhow(anyhow!(
                "chat {} reached the comment step without a bank or amount",
                process.chat
            )))
        }
    };

    let updated = {
        let mut conn = get_connection(&router.pool)?;
        ledger::apply_operation(&mut conn, process.chat, &bank, kind, amount, text.trim())?.0
    };

    log::info!(
        "chat {}: {} {} on bank {:?}, balance {}",
        process.chat,
        kind.as_str(),
        amount,
        updated.name,
        updated.balance
    );
    router.processes.clear(process.chat).await?;
    router
        .notifier
        .send(process.chat, &texts::balance_updated(&updated.name, updated.balance))
        .await
}

/// create_transfer, step 0: remember the source bank. The option list stays
/// in the working data so the destination step can show it again.
async fn choose_transfer_source(router: &Router, mut process: Process, text: &str) -> AppResult<()> {
    let Some(bank) = resolve_chosen_bank(router, &process, text).await? else {
        return Ok(());
    };

    router.notifier.send(process.chat, texts::PROMPT_AMOUNT).await?;

    process.step = 1;
    process.extra.bank = Some(bank);
    router.processes.set(process).await
}

/// create_transfer, step 1: parse the amount, ask for the destination.
async fn collect_transfer_amount(router: &Router, mut process: Process, text: &str) -> AppResult<()> {
    let Some(amount) = parse_amount(text) else {
        return router.notifier.send(process.chat, texts::INVALID_AMOUNT).await;
    };

    router
        .notifier
        .send_with_choices(process.chat, texts::PROMPT_TRANSFER_DESTINATION, &process.extra.keyboard)
        .await?;

    process.step = 2;
    process.extra.amount = Some(amount);
    router.processes.set(process).await
}

/// create_transfer, step 2: resolve and validate the destination BEFORE any
/// mutation, then commit both legs atomically.
async fn finish_transfer(router: &Router, process: Process, text: &str) -> AppResult<()> {
    let (source, amount) = match (&process.extra.bank, process.extra.amount) {
        (Some(bank), Some(amount)) => (bank.clone(), amount),
        _ => {
            return Err(AppError::Anyhow(anyhow!(
                "chat {} reached the destination step without a source or amount",
                process.chat
            )))
        }
    };

    let Some(destination) = resolve_chosen_bank(router, &process, text).await? else {
        return Ok(());
    };
    if destination.id == source.id {
        return router
            .notifier
            .send_with_choices(process.chat, texts::TRANSFER_INTO_SOURCE, &process.extra.keyboard)
            .await;
    }

    let (updated_source, updated_destination) = {
        let mut conn = get_connection(&router.pool)?;
        ledger::apply_transfer(&mut conn, process.chat, &source, &destination, amount)?
    };

    log::info!(
        "chat {}: transferred {} from {:?} to {:?}",
        process.chat,
        amount,
        updated_source.name,
        updated_destination.name
    );
    router.processes.clear(process.chat).await?;
    router
        .notifier
        .send(
            process.chat,
            &texts::transfer_done(
                &updated_source.name,
                &updated_destination.name,
                amount,
                updated_source.balance,
                updated_destination.balance,
            ),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_accepts_whole_non_negative_numbers() {
        assert_eq!(parse_amount("50"), Some(50));
        assert_eq!(parse_amount("  0 "), Some(0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("1.5"), None);
        assert_eq!(parse_amount(""), None);
    }
}
