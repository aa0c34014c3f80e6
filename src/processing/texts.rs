//! User-visible reply texts.
//!
//! Kept in one place so flows and tests agree on exact wording. Always short,
//! never a raw error or stack trace.

pub const HELP: &str = "Here's what I can do:\n\
    /create_bank — create a piggy bank\n\
    /destroy_bank — delete a piggy bank\n\
    /income — add money to a piggy bank\n\
    /expense — take money out of a piggy bank\n\
    /create_transfer — move money between piggy banks\n\
    /get_balance — check a piggy bank's balance";

pub const ONBOARDING: &str = "Hi! Let's create your first piggy bank. What should we call it?";

pub const CANCELLED: &str = "Okay. Anything else?";

pub const NO_BANKS: &str = "You don't have any piggy banks yet! Send /create_bank to make one";

pub const BANK_NAME_TAKEN: &str = "A piggy bank with that name already exists. Try another name";

pub const BANK_NOT_FOUND: &str = "There's no piggy bank with that name. Try again";

pub const INVALID_AMOUNT: &str = "That doesn't look like a valid amount. Send a whole non-negative number";

pub const UNEXPECTED_ERROR: &str = "Something went wrong on my side. Please try again in a moment";

pub const PROMPT_NEW_BANK_NAME: &str = "What should we call the new piggy bank? Send /cancel if you changed your mind";

pub const PROMPT_BANK_TO_DESTROY: &str =
    "Which piggy bank do you want to delete? Send /cancel if you changed your mind";

pub const PROMPT_BANK_FOR_BALANCE: &str =
    "Which piggy bank's balance do you want to see? Send /cancel if you changed your mind";

pub const PROMPT_BANK_FOR_OPERATION: &str =
    "Which piggy bank should we update? Send /cancel if you changed your mind";

pub const PROMPT_TRANSFER_SOURCE: &str =
    "Which piggy bank should we transfer from? Send /cancel if you changed your mind";

pub const PROMPT_AMOUNT: &str = "How much?";

pub const PROMPT_COMMENT: &str = "Add a comment for this operation";

pub const PROMPT_TRANSFER_DESTINATION: &str = "Which piggy bank should receive it?";

pub const TRANSFER_INTO_SOURCE: &str = "That's the piggy bank we're transferring from. Pick a different one";

pub const BANK_CREATED: &str = "Piggy bank created!";

pub const BANK_DESTROYED: &str = "Piggy bank deleted!";

pub fn balance(name: &str, balance: i64) -> String {
    format!("The {name} piggy bank holds {balance}")
}

pub fn balance_updated(name: &str, balance: i64) -> String {
    format!("Balance updated! The {name} piggy bank now holds {balance}")
}

pub fn transfer_done(source: &str, destination: &str, amount: i64, source_balance: i64, destination_balance: i64) -> String {
    format!(
        "Moved {amount} from {source} to {destination}.\n\n\
         {source} now holds {source_balance}\n\
         {destination} now holds {destination_balance}"
    )
}
