use std::collections::HashMap;

use gvl_types::{Address, Amount, Timestamp};

use crate::record::{VoteRecord, Voting, VotingId};

/// Votings indexed by sequential id plus the per-(voting, voter) records.
///
/// The registry is plain data: lifecycle rules live in the engine.
#[derive(Clone, Debug, Default)]
pub struct VotingRegistry {
    votings: Vec<Voting>,
    votes: HashMap<(VotingId, Address), VoteRecord>,
}

impl VotingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fresh voting and return its id.
    pub fn create(
        &mut self,
        proposer: Address,
        created_at: Timestamp,
        snapshot_seq: u64,
        duration_secs: u64,
        description: String,
    ) -> VotingId {
        let id = VotingId::new(self.votings.len() as u64);
        self.votings.push(Voting {
            id,
            proposer,
            created_at,
            snapshot_seq,
            duration_secs,
            description,
            total_accepted: Amount::zero(),
            total_rejected: Amount::zero(),
            executed: false,
            outcome: None,
        });
        id
    }

    pub fn get(&self, id: VotingId) -> Option<&Voting> {
        self.votings.get(id.index())
    }

    pub fn get_mut(&mut self, id: VotingId) -> Option<&mut Voting> {
        self.votings.get_mut(id.index())
    }

    pub fn vote_of(&self, id: VotingId, voter: &Address) -> Option<&VoteRecord> {
        self.votes.get(&(id, *voter))
    }

    pub fn record_vote(&mut self, id: VotingId, voter: Address, record: VoteRecord) {
        self.votes.insert((id, voter), record);
    }

    /// All vote records of one voting, sorted by voter.
    pub fn votes_for(&self, id: VotingId) -> Vec<(Address, VoteRecord)> {
        let mut votes: Vec<_> = self
            .votes
            .iter()
            .filter(|((vid, _), _)| *vid == id)
            .map(|((_, voter), record)| (*voter, *record))
            .collect();
        votes.sort_by_key(|(voter, _)| *voter);
        votes
    }

    pub fn len(&self) -> usize {
        self.votings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voting> {
        self.votings.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::record::VoteStatus;

    use super::*;

    #[test]
    fn ids_are_sequential_from_zero() {
        let mut registry = VotingRegistry::new();
        let p = Address::from_label("p");
        let first = registry.create(p, Timestamp::from_secs(1), 0, 10, "a".into());
        let second = registry.create(p, Timestamp::from_secs(2), 0, 10, "b".into());
        assert_eq!(first, VotingId::new(0));
        assert_eq!(second, VotingId::new(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(second).unwrap().description, "b");
        assert!(registry.get(VotingId::new(2)).is_none());
    }

    #[test]
    fn votes_are_scoped_per_voting() {
        let mut registry = VotingRegistry::new();
        let p = Address::from_label("p");
        let v = Address::from_label("v");
        let first = registry.create(p, Timestamp::zero(), 0, 10, "a".into());
        let second = registry.create(p, Timestamp::zero(), 0, 10, "b".into());

        let record = VoteRecord {
            status: VoteStatus::Accept,
            weight: Amount::from(7u64),
        };
        registry.record_vote(first, v, record);

        assert_eq!(registry.vote_of(first, &v), Some(&record));
        assert!(registry.vote_of(second, &v).is_none());
        assert_eq!(registry.votes_for(first), vec![(v, record)]);
        assert!(registry.votes_for(second).is_empty());
    }
}
