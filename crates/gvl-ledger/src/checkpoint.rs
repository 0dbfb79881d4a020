use serde::{Deserialize, Serialize};

use gvl_types::{Amount, Timestamp};

/// An account's balance immediately after a mutation.
///
/// `seq` is the journal sequence number of the mutation that produced the
/// checkpoint, so checkpoints sharing an instant stay totally ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub instant: Timestamp,
    pub seq: u64,
    pub balance: Amount,
}

impl Checkpoint {
    pub fn new(instant: Timestamp, seq: u64, balance: Amount) -> Self {
        Self {
            instant,
            seq,
            balance,
        }
    }
}

/// Append-only per-account timeline of checkpoints.
///
/// Entries are ordered by `instant`, non-decreasing. Several entries may
/// share an instant when an account is mutated more than once within the same
/// second; lookups resolve to the last of them. All lookups are binary
/// searches over the ordered vector.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHistory {
    entries: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a checkpoint. The caller guarantees `instant` is not earlier
    /// and `seq` is greater than the latest entry's.
    pub fn push(&mut self, instant: Timestamp, seq: u64, balance: Amount) {
        debug_assert!(self
            .latest()
            .map_or(true, |last| last.instant <= instant && last.seq < seq));
        self.entries.push(Checkpoint::new(instant, seq, balance));
    }

    /// Balance recorded by the last checkpoint with `instant <= at`, or zero
    /// when no such checkpoint exists.
    pub fn balance_at(&self, at: Timestamp) -> Amount {
        let upper = self.entries.partition_point(|c| c.instant <= at);
        match upper {
            0 => Amount::zero(),
            n => self.entries[n - 1].balance,
        }
    }

    /// Balance recorded by the last checkpoint with `seq <= at_seq`, or zero
    /// when no such checkpoint exists.
    pub fn balance_at_seq(&self, at_seq: u64) -> Amount {
        let upper = self.entries.partition_point(|c| c.seq <= at_seq);
        match upper {
            0 => Amount::zero(),
            n => self.entries[n - 1].balance,
        }
    }

    /// Checkpoints with `from <= instant <= to`, in order.
    pub fn range(&self, from: Timestamp, to: Timestamp) -> &[Checkpoint] {
        if from > to {
            return &[];
        }
        let start = self.entries.partition_point(|c| c.instant < from);
        let end = self.entries.partition_point(|c| c.instant <= to);
        &self.entries[start..end]
    }

    /// Discard every stored checkpoint and restart the timeline from a
    /// single synthetic checkpoint.
    pub fn reset_to(&mut self, instant: Timestamp, seq: u64, balance: Amount) {
        self.entries.clear();
        self.entries.push(Checkpoint::new(instant, seq, balance));
    }

    pub fn latest(&self) -> Option<&Checkpoint> {
        self.entries.last()
    }

    pub fn first(&self) -> Option<&Checkpoint> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Checkpoint] {
        &self.entries
    }

    /// Returns `true` if instants never decrease and sequence numbers
    /// strictly increase.
    pub fn is_monotonic(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].instant <= w[1].instant && w[0].seq < w[1].seq)
    }
}
