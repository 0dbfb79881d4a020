use std::fmt;

use serde::{Deserialize, Serialize};

use gvl_types::{Address, Amount, Timestamp};

/// Sequential, 0-based voting identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VotingId(u64);

impl VotingId {
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VotingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VotingId({})", self.0)
    }
}

impl fmt::Display for VotingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A voter's stance on a voting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteStatus {
    /// No stance. Casting `None` withdraws a previous vote.
    #[default]
    None,
    Accept,
    Reject,
}

impl fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Accept => write!(f, "Accept"),
            Self::Reject => write!(f, "Reject"),
        }
    }
}

/// The per-(voting, voter) record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub status: VoteStatus,
    /// Voter's ledger balance at the voting's creation instant.
    pub weight: Amount,
}

/// Result of executing a voting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Participation fell below quorum; the proposal is void.
    NotApplied,
    Accepted,
    /// Includes exact ties.
    Rejected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotApplied => write!(f, "NotApplied"),
            Self::Accepted => write!(f, "Accepted"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Lifecycle state of a voting relative to a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotingState {
    /// `now < closes_at`.
    Open,
    /// Window elapsed, not yet executed.
    ClosedPending,
    /// Terminal.
    Executed,
}

impl fmt::Display for VotingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::ClosedPending => write!(f, "ClosedPending"),
            Self::Executed => write!(f, "Executed"),
        }
    }
}

/// A governance voting.
///
/// Tallies change only while the voting is open; `executed` flips once and
/// nothing else changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voting {
    pub id: VotingId,
    pub proposer: Address,
    pub created_at: Timestamp,
    /// Ledger journal position at creation. Vote weights are balances as of
    /// this sequence number.
    pub snapshot_seq: u64,
    pub duration_secs: u64,
    pub description: String,
    pub total_accepted: Amount,
    pub total_rejected: Amount,
    pub executed: bool,
    pub outcome: Option<Outcome>,
}

impl Voting {
    /// First instant at which votes are no longer accepted.
    pub fn closes_at(&self) -> Timestamp {
        self.created_at.saturating_add_secs(self.duration_secs)
    }

    /// Returns `true` while `now` lies in `[created_at, closes_at)`.
    pub fn is_open(&self, now: Timestamp) -> bool {
        now < self.closes_at()
    }

    pub fn state(&self, now: Timestamp) -> VotingState {
        if self.executed {
            VotingState::Executed
        } else if self.is_open(now) {
            VotingState::Open
        } else {
            VotingState::ClosedPending
        }
    }

    /// `total_accepted + total_rejected`.
    pub fn participation(&self) -> Option<Amount> {
        self.total_accepted.checked_add(self.total_rejected)
    }
}

/// Returned by a successful execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub id: VotingId,
    pub outcome: Outcome,
    pub participation: Amount,
    pub quorum: Amount,
}
