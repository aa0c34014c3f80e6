//! End-to-end conversation tests: every flow driven through the router
//! against a real SQLite database, with a recording notifier standing in for
//! Telegram.

mod common;

use common::TestBot;
use piggybot::processing::texts;
use piggybot::storage::{banks, operations};
use pretty_assertions::assert_eq;

const CHAT: i64 = 42;

#[tokio::test]
async fn test_start_on_empty_account_onboards_into_create_bank() {
    let bot = TestBot::new();

    bot.say(CHAT, "/start").await;
    assert_eq!(bot.notifier.last().await.text, texts::ONBOARDING);

    bot.say(CHAT, "Vacation").await;
    assert_eq!(bot.notifier.last().await.text, texts::BANK_CREATED);

    let conn = bot.conn();
    let bank = banks::find_bank(&conn, CHAT, "Vacation").unwrap();
    assert_eq!(bank.balance, 0);
    assert_eq!(bank.account, CHAT);

    // The process is gone: a stray reply gets the help listing, not a
    // second bank.
    bot.say(CHAT, "Groceries").await;
    assert_eq!(bot.notifier.last().await.text, texts::HELP);
    assert!(banks::find_bank(&conn, CHAT, "Groceries").is_err());
}

#[tokio::test]
async fn test_start_with_banks_shows_help() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 0);

    bot.say(CHAT, "/start").await;
    assert_eq!(bot.notifier.last().await.text, texts::HELP);
}

#[tokio::test]
async fn test_income_flow_adds_to_balance_and_records_operation() {
    let bot = TestBot::new();
    let bank = bot.seed_bank(CHAT, "Vacation", 100);

    bot.say(CHAT, "/income").await;
    let prompt = bot.notifier.last().await;
    assert_eq!(prompt.text, texts::PROMPT_BANK_FOR_OPERATION);
    assert_eq!(prompt.choices.as_deref(), Some(&["Vacation".to_string()][..]));

    bot.say(CHAT, "Vacation").await;
    assert_eq!(bot.notifier.last().await.text, texts::PROMPT_AMOUNT);

    bot.say(CHAT, "50").await;
    assert_eq!(bot.notifier.last().await.text, texts::PROMPT_COMMENT);

    bot.say(CHAT, "bonus").await;
    assert_eq!(bot.notifier.last().await.text, texts::balance_updated("Vacation", 150));
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 150);

    let conn = bot.conn();
    let ops = operations::list_operations(&conn, CHAT, &bank.id).unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].operation, operations::OperationKind::Income);
    assert_eq!(ops[0].amount, 50);
    assert_eq!(ops[0].comment, "bonus");
}

#[tokio::test]
async fn test_expense_flow_allows_overdraft() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Rent", 30);

    bot.say(CHAT, "/expense").await;
    bot.say(CHAT, "Rent").await;
    bot.say(CHAT, "100").await;
    bot.say(CHAT, "deposit").await;

    // No floor: the domain allows overdraft banks.
    assert_eq!(bot.balance_of(CHAT, "Rent"), -70);
    assert_eq!(bot.notifier.last().await.text, texts::balance_updated("Rent", -70));
}

#[tokio::test]
async fn test_invalid_amount_keeps_step_and_selected_bank() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 100);

    bot.say(CHAT, "/income").await;
    bot.say(CHAT, "Vacation").await;

    bot.say(CHAT, "abc").await;
    assert_eq!(bot.notifier.last().await.text, texts::INVALID_AMOUNT);
    bot.say(CHAT, "-5").await;
    assert_eq!(bot.notifier.last().await.text, texts::INVALID_AMOUNT);

    // Retrying with a valid amount continues from the same step with the
    // same bank.
    bot.say(CHAT, "20").await;
    assert_eq!(bot.notifier.last().await.text, texts::PROMPT_COMMENT);
    bot.say(CHAT, "found on the street").await;
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 120);
}

#[tokio::test]
async fn test_unknown_bank_re_prompts_with_same_choices() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 0);
    bot.seed_bank(CHAT, "Rent", 0);

    bot.say(CHAT, "/get_balance").await;
    bot.say(CHAT, "Groceries").await;

    let reply = bot.notifier.last().await;
    assert_eq!(reply.text, texts::BANK_NOT_FOUND);
    assert_eq!(
        reply.choices.as_deref(),
        Some(&["Vacation".to_string(), "Rent".to_string()][..])
    );

    // Still at the same step: a valid pick now succeeds.
    bot.say(CHAT, "Rent").await;
    assert_eq!(bot.notifier.last().await.text, texts::balance("Rent", 0));
}

#[tokio::test]
async fn test_get_balance_is_read_only() {
    let bot = TestBot::new();
    let bank = bot.seed_bank(CHAT, "Vacation", 100);

    bot.say(CHAT, "/get_balance").await;
    bot.say(CHAT, "Vacation").await;

    assert_eq!(bot.notifier.last().await.text, texts::balance("Vacation", 100));
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 100);
    let conn = bot.conn();
    assert!(operations::list_operations(&conn, CHAT, &bank.id).unwrap().is_empty());
}

#[tokio::test]
async fn test_transfer_conserves_total_and_records_both_legs() {
    let bot = TestBot::new();
    let vacation = bot.seed_bank(CHAT, "Vacation", 100);
    let rent = bot.seed_bank(CHAT, "Rent", 50);

    bot.say(CHAT, "/create_transfer").await;
    assert_eq!(bot.notifier.last().await.text, texts::PROMPT_TRANSFER_SOURCE);

    bot.say(CHAT, "Vacation").await;
    assert_eq!(bot.notifier.last().await.text, texts::PROMPT_AMOUNT);

    bot.say(CHAT, "30").await;
    let destination_prompt = bot.notifier.last().await;
    assert_eq!(destination_prompt.text, texts::PROMPT_TRANSFER_DESTINATION);
    assert!(destination_prompt.choices.is_some());

    bot.say(CHAT, "Rent").await;
    assert_eq!(
        bot.notifier.last().await.text,
        texts::transfer_done("Vacation", "Rent", 30, 70, 80)
    );

    assert_eq!(bot.balance_of(CHAT, "Vacation"), 70);
    assert_eq!(bot.balance_of(CHAT, "Rent"), 80);

    let conn = bot.conn();
    let source_ops = operations::list_operations(&conn, CHAT, &vacation.id).unwrap();
    assert_eq!(source_ops.len(), 1);
    assert_eq!(source_ops[0].operation, operations::OperationKind::Expense);
    assert_eq!(source_ops[0].comment, "transfer to Rent");

    let destination_ops = operations::list_operations(&conn, CHAT, &rent.id).unwrap();
    assert_eq!(destination_ops.len(), 1);
    assert_eq!(destination_ops[0].operation, operations::OperationKind::Income);
    assert_eq!(destination_ops[0].comment, "transfer from Vacation");
}

#[tokio::test]
async fn test_transfer_with_unknown_destination_mutates_nothing() {
    let bot = TestBot::new();
    let vacation = bot.seed_bank(CHAT, "Vacation", 100);

    bot.say(CHAT, "/create_transfer").await;
    bot.say(CHAT, "Vacation").await;
    bot.say(CHAT, "30").await;
    bot.say(CHAT, "Groceries").await;

    // Destination is validated before the source leg commits: both the
    // balance and the ledger are untouched.
    assert_eq!(bot.notifier.last().await.text, texts::BANK_NOT_FOUND);
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 100);
    let conn = bot.conn();
    assert!(operations::list_operations(&conn, CHAT, &vacation.id).unwrap().is_empty());

    // And the flow is still alive at the destination step.
    drop(conn);
    bot.seed_bank(CHAT, "Rent", 0);
    bot.say(CHAT, "Rent").await;
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 70);
    assert_eq!(bot.balance_of(CHAT, "Rent"), 30);
}

#[tokio::test]
async fn test_transfer_into_source_is_rejected() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 100);
    bot.seed_bank(CHAT, "Rent", 0);

    bot.say(CHAT, "/create_transfer").await;
    bot.say(CHAT, "Vacation").await;
    bot.say(CHAT, "30").await;
    bot.say(CHAT, "Vacation").await;

    assert_eq!(bot.notifier.last().await.text, texts::TRANSFER_INTO_SOURCE);
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 100);

    bot.say(CHAT, "Rent").await;
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 70);
    assert_eq!(bot.balance_of(CHAT, "Rent"), 30);
}

#[tokio::test]
async fn test_duplicate_bank_name_re_prompts() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 0);

    bot.say(CHAT, "/create_bank").await;
    bot.say(CHAT, "Vacation").await;
    assert_eq!(bot.notifier.last().await.text, texts::BANK_NAME_TAKEN);

    // Still at step 0: another name goes through.
    bot.say(CHAT, "Car").await;
    assert_eq!(bot.notifier.last().await.text, texts::BANK_CREATED);
    let conn = bot.conn();
    assert!(banks::find_bank(&conn, CHAT, "Car").is_ok());
}

#[tokio::test]
async fn test_destroy_bank_keeps_historical_operations() {
    let bot = TestBot::new();
    let bank = bot.seed_bank(CHAT, "Vacation", 100);

    bot.say(CHAT, "/income").await;
    bot.say(CHAT, "Vacation").await;
    bot.say(CHAT, "50").await;
    bot.say(CHAT, "bonus").await;

    bot.say(CHAT, "/destroy_bank").await;
    bot.say(CHAT, "Vacation").await;
    assert_eq!(bot.notifier.last().await.text, texts::BANK_DESTROYED);

    let conn = bot.conn();
    assert!(banks::find_bank(&conn, CHAT, "Vacation").is_err());
    // Ledger is append-only: the orphaned entry survives its bank.
    let ops = operations::list_operations(&conn, CHAT, &bank.id).unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].amount, 50);
}

#[tokio::test]
async fn test_flow_commands_on_empty_account_create_no_process() {
    let bot = TestBot::new();

    for command in ["/destroy_bank", "/get_balance", "/income", "/expense", "/create_transfer"] {
        bot.say(CHAT, command).await;
        assert_eq!(bot.notifier.last().await.text, texts::NO_BANKS);
    }

    // No process was created: the next message is unrecognized.
    bot.say(CHAT, "Vacation").await;
    assert_eq!(bot.notifier.last().await.text, texts::HELP);
}

#[tokio::test]
async fn test_new_top_level_command_discards_prior_flow() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 100);

    // Walk income to the comment step, then restart with /create_bank.
    bot.say(CHAT, "/income").await;
    bot.say(CHAT, "Vacation").await;
    bot.say(CHAT, "50").await;
    bot.say(CHAT, "/create_bank").await;

    // The reply must be read as a bank name, not as the income comment.
    bot.say(CHAT, "Gifts").await;
    assert_eq!(bot.notifier.last().await.text, texts::BANK_CREATED);
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 100);
    let conn = bot.conn();
    assert!(banks::find_bank(&conn, CHAT, "Gifts").is_ok());
}

#[tokio::test]
async fn test_cancel_clears_process_and_ledger_is_untouched() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 100);

    bot.say(CHAT, "/expense").await;
    bot.say(CHAT, "Vacation").await;
    bot.say(CHAT, "50").await;
    bot.say(CHAT, "/cancel").await;
    assert_eq!(bot.notifier.last().await.text, texts::CANCELLED);

    // Nothing was applied and the conversation is over.
    assert_eq!(bot.balance_of(CHAT, "Vacation"), 100);
    bot.say(CHAT, "anything").await;
    assert_eq!(bot.notifier.last().await.text, texts::HELP);
}

#[tokio::test]
async fn test_unrecognized_message_without_process_shows_help() {
    let bot = TestBot::new();
    bot.seed_bank(CHAT, "Vacation", 0);

    bot.say(CHAT, "what can you do?").await;
    assert_eq!(bot.notifier.last().await.text, texts::HELP);

    // Command tokens with arguments are not top-level commands.
    bot.say(CHAT, "/income 50").await;
    assert_eq!(bot.notifier.last().await.text, texts::HELP);
}

#[tokio::test]
async fn test_chats_are_isolated() {
    let bot = TestBot::new();
    bot.seed_bank(1, "Vacation", 100);
    bot.seed_bank(2, "Vacation", 5);

    bot.say(1, "/income").await;
    bot.say(2, "/expense").await;
    bot.say(1, "Vacation").await;
    bot.say(2, "Vacation").await;
    bot.say(1, "50").await;
    bot.say(2, "5").await;
    bot.say(1, "salary").await;
    bot.say(2, "coffee").await;

    assert_eq!(bot.balance_of(1, "Vacation"), 150);
    assert_eq!(bot.balance_of(2, "Vacation"), 0);
}
