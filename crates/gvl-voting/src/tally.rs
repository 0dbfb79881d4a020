//! Vote-change accounting.
//!
//! A (re)cast vote is a transition `previous -> next` over
//! `{None, Accept, Reject}`. Each transition retracts the voter's weight from
//! at most one total and adds it to at most one total. Keeping the table
//! explicit makes `accepted + rejected == sum of non-None weights` checkable
//! case by case.

use gvl_types::Amount;

use crate::record::VoteStatus;

/// One of the two running totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Accepted,
    Rejected,
}

/// Which totals a transition touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub retract_from: Option<Side>,
    pub add_to: Option<Side>,
}

/// The full `previous × next` table.
pub const fn transition(previous: VoteStatus, next: VoteStatus) -> Transition {
    use Side::{Accepted, Rejected};
    use VoteStatus as S;

    let (retract_from, add_to) = match (previous, next) {
        (S::None, S::None) => (None, None),
        (S::None, S::Accept) => (None, Some(Accepted)),
        (S::None, S::Reject) => (None, Some(Rejected)),
        (S::Accept, S::None) => (Some(Accepted), None),
        (S::Accept, S::Accept) => (Some(Accepted), Some(Accepted)),
        (S::Accept, S::Reject) => (Some(Accepted), Some(Rejected)),
        (S::Reject, S::None) => (Some(Rejected), None),
        (S::Reject, S::Accept) => (Some(Rejected), Some(Accepted)),
        (S::Reject, S::Reject) => (Some(Rejected), Some(Rejected)),
    };
    Transition {
        retract_from,
        add_to,
    }
}

/// Accept/reject running totals of a voting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub accepted: Amount,
    pub rejected: Amount,
}

impl Tally {
    pub fn new(accepted: Amount, rejected: Amount) -> Self {
        Self { accepted, rejected }
    }

    /// Apply a transition and return the new totals, or `None` if a total
    /// would leave the 256-bit range. `self` is left untouched either way.
    pub fn apply(
        &self,
        transition: Transition,
        previous_weight: Amount,
        weight: Amount,
    ) -> Option<Tally> {
        let mut next = *self;
        if let Some(side) = transition.retract_from {
            let total = next.total_mut(side);
            *total = total.checked_sub(previous_weight)?;
        }
        if let Some(side) = transition.add_to {
            let total = next.total_mut(side);
            *total = total.checked_add(weight)?;
        }
        Some(next)
    }

    fn total_mut(&mut self, side: Side) -> &mut Amount {
        match side {
            Side::Accepted => &mut self.accepted,
            Side::Rejected => &mut self.rejected,
        }
    }
}
