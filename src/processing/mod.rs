//! The conversational state machine: one multi-step process per chat, driven
//! by the command router and the per-flow step handlers.
//!
//! Nothing in this module touches Telegram types. Messages come in as
//! `(chat, text)` pairs and go out through the [`Notifier`] trait, so the
//! whole subsystem runs unchanged under the real transport or a test mock.

pub mod flows;
pub mod gate;
pub mod notifier;
pub mod router;
pub mod store;
pub mod texts;

pub use notifier::Notifier;
pub use router::Router;
pub use store::{process_store_from_config, MemoryProcessStore, ProcessStore, SqliteProcessStore};

use serde::{Deserialize, Serialize};

use crate::storage::banks::Bank;

/// The six conversational flows, one per top-level command.
///
/// Dispatching on this enum (plus the step counter) replaces the command-text
/// string comparisons that would otherwise be duplicated across handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    CreateBank,
    DestroyBank,
    GetBalance,
    Income,
    Expense,
    CreateTransfer,
}

impl Flow {
    /// Stable name used for persistence and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Flow::CreateBank => "create_bank",
            Flow::DestroyBank => "destroy_bank",
            Flow::GetBalance => "get_balance",
            Flow::Income => "income",
            Flow::Expense => "expense",
            Flow::CreateTransfer => "create_transfer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "create_bank" => Some(Flow::CreateBank),
            "destroy_bank" => Some(Flow::DestroyBank),
            "get_balance" => Some(Flow::GetBalance),
            "income" => Some(Flow::Income),
            "expense" => Some(Flow::Expense),
            "create_transfer" => Some(Flow::CreateTransfer),
            _ => None,
        }
    }
}

/// Flow-scoped working data carried between steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    /// Bank selected at a "choose a bank" step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<Bank>,
    /// Amount collected at an "how much?" step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Quick-reply options shown at the current step, kept so a failed
    /// selection can re-show the same list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyboard: Vec<String>,
}

/// The single in-flight conversation state for a chat.
///
/// At most one per chat; setting a new one discards the old unconditionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub chat: i64,
    pub flow: Flow,
    pub step: u32,
    pub extra: Extra,
}

impl Process {
    /// A fresh process at step 0 with empty working data.
    pub fn new(chat: i64, flow: Flow) -> Self {
        Self {
            chat,
            flow,
            step: 0,
            extra: Extra::default(),
        }
    }
}
