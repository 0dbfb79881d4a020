use serde::{Deserialize, Serialize};

use gvl_types::{Address, Amount, Timestamp};

use crate::record::{Outcome, VoteStatus, VotingId};

/// Observer-visible record of an applied engine command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VotingEvent {
    Started {
        id: VotingId,
        proposer: Address,
        created_at: Timestamp,
        closes_at: Timestamp,
        description: String,
    },
    VoteCast {
        id: VotingId,
        voter: Address,
        status: VoteStatus,
        weight: Amount,
        at: Timestamp,
    },
    Executed {
        id: VotingId,
        outcome: Outcome,
        total_accepted: Amount,
        total_rejected: Amount,
        quorum: Amount,
        at: Timestamp,
    },
}

impl VotingEvent {
    pub fn voting_id(&self) -> VotingId {
        match self {
            Self::Started { id, .. } | Self::VoteCast { id, .. } | Self::Executed { id, .. } => *id,
        }
    }
}
