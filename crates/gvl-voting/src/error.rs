use std::fmt;

use gvl_ledger::LedgerError;
use gvl_types::Timestamp;

use crate::record::VotingId;

/// Errors produced by voting operations.
///
/// Every error is raised before any tally or record is touched.
#[derive(Debug, thiserror::Error)]
pub enum VotingError {
    /// No voting with this id exists.
    #[error("voting {0} not found")]
    VotingNotFound(VotingId),

    /// A vote was cast after the window elapsed.
    #[error("voting {id} closed at {closed_at}")]
    VotingClosed { id: VotingId, closed_at: Timestamp },

    /// Execution was requested before the window elapsed.
    #[error("voting {id} is open until {closes_at}")]
    VotingStillOpen { id: VotingId, closes_at: Timestamp },

    /// The voting has already been finalized.
    #[error("voting {0} already executed")]
    VotingAlreadyExecuted(VotingId),

    /// A caller-supplied argument is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A running total would exceed the 256-bit range.
    #[error("tally overflow in voting {0}")]
    TallyOverflow(VotingId),

    /// The ledger failed while reading a historical balance.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("voting lock poisoned: {0}")]
    LockPoisoned(String),
}

impl PartialEq for VotingError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for VotingError {}
