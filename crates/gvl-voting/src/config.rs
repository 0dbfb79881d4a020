use serde::{Deserialize, Serialize};

use crate::error::VotingError;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Which ledger quantity the quorum percentage is taken of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuorumBasis {
    /// All-time minted total at execution time. Burns do not lower it.
    #[default]
    LifetimeMinted,
    /// Live total supply at execution time.
    LiveSupply,
}

/// Configuration for the voting engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VotingConfig {
    /// Percentage of the quorum basis that participation must reach.
    pub quorum_percent: u8,
    /// Quantity the quorum percentage is applied to.
    pub quorum_basis: QuorumBasis,
    /// Shortest accepted voting window.
    pub min_duration_secs: u64,
    /// Longest accepted voting window.
    pub max_duration_secs: u64,
    /// Maximum description length in bytes.
    pub max_description_len: usize,
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            quorum_percent: 20,
            quorum_basis: QuorumBasis::LifetimeMinted,
            min_duration_secs: 1,
            max_duration_secs: 365 * DAY_SECS,
            max_description_len: 1024,
        }
    }
}

impl VotingConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), VotingError> {
        if self.quorum_percent > 100 {
            return Err(VotingError::Config(format!(
                "quorum_percent must be at most 100, got {}",
                self.quorum_percent
            )));
        }
        if self.min_duration_secs == 0 {
            return Err(VotingError::Config(
                "min_duration_secs must be positive".into(),
            ));
        }
        if self.min_duration_secs > self.max_duration_secs {
            return Err(VotingError::Config(format!(
                "min_duration_secs {} exceeds max_duration_secs {}",
                self.min_duration_secs, self.max_duration_secs
            )));
        }
        Ok(())
    }
}
