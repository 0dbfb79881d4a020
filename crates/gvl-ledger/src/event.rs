use std::fmt;

use serde::{Deserialize, Serialize};

use gvl_types::{Address, Amount, Timestamp};

/// A successfully applied ledger mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    Minted {
        to: Address,
        amount: Amount,
    },
    Burned {
        from: Address,
        amount: Amount,
    },
    Transferred {
        from: Address,
        to: Address,
        amount: Amount,
    },
    HistoryCleared {
        account: Address,
        balance: Amount,
    },
}

impl LedgerEvent {
    /// Accounts whose checkpoint history this event touched.
    pub fn accounts(&self) -> Vec<Address> {
        match self {
            Self::Minted { to, .. } => vec![*to],
            Self::Burned { from, .. } => vec![*from],
            Self::Transferred { from, to, .. } if from == to => vec![*from],
            Self::Transferred { from, to, .. } => vec![*from, *to],
            Self::HistoryCleared { account, .. } => vec![*account],
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minted { to, amount } => write!(f, "mint {amount} -> {}", to.short_id()),
            Self::Burned { from, amount } => write!(f, "burn {amount} <- {}", from.short_id()),
            Self::Transferred { from, to, amount } => write!(
                f,
                "transfer {amount} {} -> {}",
                from.short_id(),
                to.short_id()
            ),
            Self::HistoryCleared { account, .. } => {
                write!(f, "clear history of {}", account.short_id())
            }
        }
    }
}

/// Journal row: an event with its sequence number and instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// 1-based, gap-free position in the journal.
    pub seq: u64,
    pub at: Timestamp,
    pub event: LedgerEvent,
}
