//! High-level SDK for the Governed Value Ledger.
//!
//! [`Governance`] binds the in-memory ledger and the voting engine to a
//! single [`Clock`], so callers issue commands without passing the time.
//! This is the main entry point for applications embedding GVL.

pub mod clock;
pub mod error;
pub mod governance;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{SdkError, SdkResult};
pub use governance::{Governance, Summary};

// Re-export key types
pub use gvl_ledger::{Checkpoint, JournalEntry, LedgerEvent, ValidationReport};
pub use gvl_types::{parse_amount, Address, Amount, Timestamp};
pub use gvl_voting::{
    ExecutionResult, Outcome, QuorumBasis, VoteRecord, VoteStatus, Voting, VotingConfig,
    VotingEvent, VotingId, VotingState,
};
