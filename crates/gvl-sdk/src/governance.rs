use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use gvl_ledger::{
    Checkpoint, HistoryValidator, InMemoryLedger, JournalEntry, LedgerReader, LedgerWriter,
    ReplayEngine, ValidationReport,
};
use gvl_types::{Address, Amount, Timestamp};
use gvl_voting::{
    ExecutionResult, VoteRecord, VoteStatus, Voting, VotingConfig, VotingEngine, VotingEvent,
    VotingId, VotingState,
};

use crate::clock::{Clock, SystemClock};
use crate::error::{SdkError, SdkResult};

/// Aggregate counters of a governance instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub now: Timestamp,
    pub total_supply: Amount,
    pub max_minted: Amount,
    pub total_burned: Amount,
    pub accounts: usize,
    pub journal_entries: usize,
    pub votings: usize,
}

/// High-level governance API: a history-aware ledger plus a voting engine
/// that weighs votes by it, both stamped by one clock.
pub struct Governance {
    ledger: Arc<InMemoryLedger>,
    voting: VotingEngine<InMemoryLedger>,
    clock: Arc<dyn Clock>,
}

impl Governance {
    /// Create an empty instance driven by `clock`.
    pub fn new(config: VotingConfig, clock: Arc<dyn Clock>) -> SdkResult<Self> {
        let ledger = Arc::new(InMemoryLedger::new());
        let voting = VotingEngine::new(Arc::clone(&ledger), config)?;
        Ok(Self {
            ledger,
            voting,
            clock,
        })
    }

    /// Create an empty instance on the wall clock.
    pub fn with_system_clock(config: VotingConfig) -> SdkResult<Self> {
        Self::new(config, Arc::new(SystemClock::new()))
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    pub fn voting(&self) -> &VotingEngine<InMemoryLedger> {
        &self.voting
    }

    pub fn config(&self) -> &VotingConfig {
        self.voting.config()
    }

    // ---- Ledger commands ----

    pub fn mint(&self, to: &Address, amount: Amount) -> SdkResult<JournalEntry> {
        rejected("mint", self.ledger.mint(to, amount, self.now()))
    }

    pub fn burn(&self, from: &Address, amount: Amount) -> SdkResult<JournalEntry> {
        rejected("burn", self.ledger.burn(from, amount, self.now()))
    }

    pub fn transfer(&self, from: &Address, to: &Address, amount: Amount) -> SdkResult<JournalEntry> {
        rejected("transfer", self.ledger.transfer(from, to, amount, self.now()))
    }

    pub fn clear_account_history(&self, caller: &Address) -> SdkResult<JournalEntry> {
        rejected(
            "clear_account_history",
            self.ledger.clear_account_history(caller, self.now()),
        )
    }

    // ---- Ledger queries ----

    pub fn balance_at(&self, account: &Address, at: Timestamp) -> SdkResult<Amount> {
        Ok(self.ledger.balance_at(account, at)?)
    }

    pub fn balance_of(&self, account: &Address) -> SdkResult<Amount> {
        Ok(self.ledger.balance_of(account)?)
    }

    pub fn checkpoints(&self, account: &Address) -> SdkResult<Vec<Checkpoint>> {
        Ok(self.ledger.checkpoints(account)?)
    }

    pub fn checkpoints_between(
        &self,
        account: &Address,
        from: Timestamp,
        to: Timestamp,
    ) -> SdkResult<Vec<Checkpoint>> {
        Ok(self.ledger.checkpoints_between(account, from, to)?)
    }

    pub fn total_supply(&self) -> SdkResult<Amount> {
        Ok(self.ledger.total_supply()?)
    }

    pub fn max_minted(&self) -> SdkResult<Amount> {
        Ok(self.ledger.max_minted()?)
    }

    pub fn journal(&self) -> SdkResult<Vec<JournalEntry>> {
        Ok(self.ledger.journal()?)
    }

    // ---- Voting commands ----

    pub fn start_voting(
        &self,
        caller: &Address,
        duration_secs: u64,
        description: &str,
    ) -> SdkResult<VotingId> {
        rejected(
            "start_voting",
            self.voting
                .start_voting(caller, duration_secs, description, self.now()),
        )
    }

    pub fn vote(&self, caller: &Address, id: VotingId, status: VoteStatus) -> SdkResult<VoteRecord> {
        rejected("vote", self.voting.vote(caller, id, status, self.now()))
    }

    pub fn execute_voting(&self, id: VotingId) -> SdkResult<ExecutionResult> {
        rejected("execute_voting", self.voting.execute_voting(id, self.now()))
    }

    // ---- Voting queries ----

    pub fn get_voting(&self, id: VotingId) -> SdkResult<Voting> {
        Ok(self.voting.get_voting(id)?)
    }

    pub fn voting_count(&self) -> SdkResult<usize> {
        Ok(self.voting.voting_count()?)
    }

    pub fn vote_of(&self, id: VotingId, voter: &Address) -> SdkResult<Option<VoteRecord>> {
        Ok(self.voting.vote_of(id, voter)?)
    }

    pub fn voting_state(&self, id: VotingId) -> SdkResult<VotingState> {
        Ok(self.voting.state(id, self.now())?)
    }

    pub fn voting_events(&self) -> SdkResult<Vec<VotingEvent>> {
        Ok(self.voting.events()?)
    }

    // ---- Audit ----

    /// Check history ordering, live/checkpoint agreement, and conservation.
    pub fn validate(&self) -> SdkResult<ValidationReport> {
        Ok(HistoryValidator::validate(self.ledger.as_ref())?)
    }

    /// Rebuild state from the journal and compare with the live ledger.
    pub fn verify_replay(&self) -> SdkResult<bool> {
        Ok(ReplayEngine::verify_convergence(self.ledger.as_ref())?)
    }

    pub fn summary(&self) -> SdkResult<Summary> {
        Ok(Summary {
            now: self.now(),
            total_supply: self.ledger.total_supply()?,
            max_minted: self.ledger.max_minted()?,
            total_burned: self.ledger.total_burned()?,
            accounts: self.ledger.accounts()?.len(),
            journal_entries: self.ledger.journal()?.len(),
            votings: self.voting.voting_count()?,
        })
    }
}

/// Log a rejected command and lift its error into the SDK taxonomy.
fn rejected<T, E>(command: &'static str, result: Result<T, E>) -> SdkResult<T>
where
    E: Display + Into<SdkError>,
{
    result.map_err(|e| {
        warn!(command, error = %e, "command rejected");
        e.into()
    })
}

#[cfg(test)]
mod tests {
    use gvl_ledger::{LedgerError, LedgerEvent};
    use gvl_voting::{Outcome, QuorumBasis, VotingError};

    use crate::clock::ManualClock;

    use super::*;

    const ONE_DAY: u64 = 86_401;
    const THIRTY_DAYS: u64 = 30 * ONE_DAY + 1;

    fn amt(n: u64) -> Amount {
        Amount::from(n)
    }

    fn ts(secs: u64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn setup() -> (Governance, Arc<ManualClock>) {
        setup_with(VotingConfig::default())
    }

    fn setup_with(config: VotingConfig) -> (Governance, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(ts(1_000)));
        let gov = Governance::new(config, clock.clone()).unwrap();
        (gov, clock)
    }

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    // -----------------------------------------------------------------------
    // 1. Single holder wins its own voting; late votes bounce
    // -----------------------------------------------------------------------
    #[test]
    fn sole_holder_accepts_and_late_vote_fails() {
        let (gov, clock) = setup();
        let a = addr("a");
        gov.mint(&a, amt(100)).unwrap();

        let id = gov.start_voting(&a, ONE_DAY, "proposal").unwrap();
        clock.advance(10);
        gov.vote(&a, id, VoteStatus::Accept).unwrap();

        clock.advance(ONE_DAY);
        assert_eq!(gov.voting_state(id).unwrap(), VotingState::ClosedPending);
        assert!(matches!(
            gov.vote(&a, id, VoteStatus::Reject),
            Err(SdkError::Voting(VotingError::VotingClosed { .. }))
        ));

        let result = gov.execute_voting(id).unwrap();
        assert_eq!(result.outcome, Outcome::Accepted);
        let voting = gov.get_voting(id).unwrap();
        assert_eq!(voting.total_accepted, amt(100));
        assert!(voting.total_rejected.is_zero());
    }

    // -----------------------------------------------------------------------
    // 2-4. Community of ten: quorum, tie, majority
    // -----------------------------------------------------------------------
    fn community(gov: &Governance) -> Vec<Address> {
        let holders: Vec<Address> = (0..10).map(|i| addr(&format!("party-{i}"))).collect();
        let grants = [3000u64, 2000, 1000, 500, 500, 500, 500, 500, 500, 1000];
        for (holder, grant) in holders.iter().zip(grants) {
            gov.mint(holder, amt(grant)).unwrap();
        }
        holders
    }

    #[test]
    fn community_votings_resolve_by_quorum_and_majority() {
        let (gov, clock) = setup();
        let p = community(&gov);
        clock.advance(1);

        let small = gov.start_voting(&p[0], THIRTY_DAYS, "voting 0").unwrap();
        let tied = gov.start_voting(&p[0], THIRTY_DAYS, "voting 1").unwrap();
        let popular = gov.start_voting(&p[0], THIRTY_DAYS, "voting 2").unwrap();
        clock.advance(1);

        gov.vote(&p[9], small, VoteStatus::Accept).unwrap();

        gov.vote(&p[0], tied, VoteStatus::Accept).unwrap();
        gov.vote(&p[1], tied, VoteStatus::Reject).unwrap();
        gov.vote(&p[2], tied, VoteStatus::Reject).unwrap();

        gov.vote(&p[0], popular, VoteStatus::Accept).unwrap();
        gov.vote(&p[1], popular, VoteStatus::Accept).unwrap();
        gov.vote(&p[2], popular, VoteStatus::Accept).unwrap();
        gov.vote(&p[3], popular, VoteStatus::Reject).unwrap();

        clock.advance(THIRTY_DAYS);
        assert_eq!(gov.execute_voting(small).unwrap().outcome, Outcome::NotApplied);
        assert_eq!(gov.execute_voting(tied).unwrap().outcome, Outcome::Rejected);
        assert_eq!(gov.execute_voting(popular).unwrap().outcome, Outcome::Accepted);

        assert!(gov.get_voting(small).unwrap().executed);
        let popular = gov.get_voting(popular).unwrap();
        assert_eq!(popular.total_accepted, amt(6000));
        assert_eq!(popular.total_rejected, amt(500));

        let executed: Vec<Outcome> = gov
            .voting_events()
            .unwrap()
            .into_iter()
            .filter_map(|e| match e {
                VotingEvent::Executed { outcome, .. } => Some(outcome),
                _ => None,
            })
            .collect();
        assert_eq!(
            executed,
            vec![Outcome::NotApplied, Outcome::Rejected, Outcome::Accepted]
        );
    }

    #[test]
    fn tokens_moved_after_creation_do_not_vote_twice() {
        let (gov, clock) = setup();
        let a = addr("a");
        let b = addr("b");
        gov.mint(&a, amt(100)).unwrap();
        clock.advance(1);

        let id = gov.start_voting(&a, ONE_DAY, "double spend").unwrap();
        clock.advance(1);
        gov.vote(&a, id, VoteStatus::Accept).unwrap();
        gov.transfer(&a, &b, amt(100)).unwrap();
        let record = gov.vote(&b, id, VoteStatus::Accept).unwrap();

        assert!(record.weight.is_zero());
        assert_eq!(gov.get_voting(id).unwrap().total_accepted, amt(100));
    }

    #[test]
    fn tokens_moved_within_the_creation_second_do_not_vote_twice() {
        let (gov, _clock) = setup();
        let a = addr("a");
        let b = addr("b");
        gov.mint(&a, amt(100)).unwrap();

        let id = gov.start_voting(&a, ONE_DAY, "same second").unwrap();
        gov.vote(&a, id, VoteStatus::Accept).unwrap();
        gov.transfer(&a, &b, amt(100)).unwrap();
        let record = gov.vote(&b, id, VoteStatus::Accept).unwrap();

        assert!(record.weight.is_zero());
        let voting = gov.get_voting(id).unwrap();
        assert_eq!(voting.total_accepted, amt(100));
        assert!(voting.total_accepted <= gov.total_supply().unwrap());
    }

    // -----------------------------------------------------------------------
    // 5. Failed transfer leaves no trace
    // -----------------------------------------------------------------------
    #[test]
    fn overdraft_appends_nothing() {
        let (gov, clock) = setup();
        let a = addr("a");
        let b = addr("b");
        gov.mint(&a, amt(10)).unwrap();
        clock.advance(5);

        let err = gov.transfer(&a, &b, amt(11)).unwrap_err();
        assert!(matches!(
            err,
            SdkError::Ledger(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(gov.checkpoints(&a).unwrap().len(), 1);
        assert!(gov.checkpoints(&b).unwrap().is_empty());
        assert_eq!(gov.journal().unwrap().len(), 1);
        assert_eq!(gov.balance_of(&a).unwrap(), amt(10));
    }

    // -----------------------------------------------------------------------
    // 6. Clearing history hides the past but keeps the present
    // -----------------------------------------------------------------------
    #[test]
    fn cleared_history_reads_zero_before_clear() {
        let (gov, clock) = setup();
        let a = addr("a");
        gov.mint(&a, amt(40)).unwrap();
        clock.advance(10);
        gov.burn(&a, amt(15)).unwrap();
        clock.advance(10);
        let cleared_at = gov.now();
        gov.clear_account_history(&a).unwrap();

        assert!(gov.balance_at(&a, ts(1_000)).unwrap().is_zero());
        assert!(gov.balance_at(&a, ts(1_010)).unwrap().is_zero());
        assert_eq!(gov.balance_at(&a, cleared_at).unwrap(), amt(25));
        assert_eq!(gov.balance_at(&a, ts(u64::MAX)).unwrap(), amt(25));
        assert_eq!(gov.checkpoints(&a).unwrap().len(), 1);

        assert!(gov.validate().unwrap().is_valid());
        assert!(gov.verify_replay().unwrap());
    }

    // -----------------------------------------------------------------------
    // 7. Eight timed mutations, point queries, then a clear
    // -----------------------------------------------------------------------
    #[test]
    fn timed_history_then_clear() {
        let (gov, clock) = setup();
        let p0 = addr("party-0");
        let p1 = addr("party-1");

        let steps: [(&str, u64); 8] = [
            ("mint", 2000),
            ("send", 1),
            ("send", 1),
            ("burn", 1),
            ("receive", 1),
            ("send", 1998),
            ("receive", 1998),
            ("mint", 2),
        ];
        let expected = [2000u64, 1999, 1998, 1997, 1998, 0, 1998, 2000];

        let mut instants = Vec::new();
        for (op, value) in steps {
            clock.advance(1);
            let applied = match op {
                "mint" => gov.mint(&p0, amt(value)),
                "send" => gov.transfer(&p0, &p1, amt(value)),
                "receive" => gov.transfer(&p1, &p0, amt(value)),
                _ => gov.burn(&p0, amt(value)),
            };
            applied.unwrap();
            instants.push(gov.now());
        }

        for (at, balance) in instants.iter().zip(expected) {
            assert_eq!(gov.balance_at(&p0, *at).unwrap(), amt(balance), "at {at}");
        }
        // One second before the first mutation nothing was held.
        assert!(gov.balance_at(&p0, ts(1_000)).unwrap().is_zero());

        // Clearing at the last instant keeps only the live balance there.
        gov.clear_account_history(&p0).unwrap();
        let (last, earlier) = instants.split_last().unwrap();
        for at in earlier {
            assert!(gov.balance_at(&p0, *at).unwrap().is_zero(), "at {at}");
        }
        assert_eq!(gov.balance_at(&p0, *last).unwrap(), amt(2000));

        // The counterparty's history is untouched.
        assert_eq!(gov.balance_at(&p1, instants[5]).unwrap(), amt(1999));

        let last_event = gov.journal().unwrap().pop().unwrap();
        assert!(matches!(
            last_event.event,
            LedgerEvent::HistoryCleared { balance, .. } if balance == amt(2000)
        ));
    }

    #[test]
    fn live_supply_basis_is_configurable() {
        let (gov, clock) = setup_with(VotingConfig {
            quorum_basis: QuorumBasis::LiveSupply,
            ..Default::default()
        });
        let a = addr("a");
        let b = addr("b");
        gov.mint(&a, amt(100)).unwrap();
        gov.mint(&b, amt(900)).unwrap();
        let id = gov.start_voting(&a, ONE_DAY, "after burn").unwrap();
        gov.vote(&a, id, VoteStatus::Accept).unwrap();
        gov.burn(&b, amt(900)).unwrap();

        clock.advance(ONE_DAY);
        let result = gov.execute_voting(id).unwrap();
        assert_eq!(result.quorum, amt(20));
        assert_eq!(result.outcome, Outcome::Accepted);
    }

    #[test]
    fn summary_counts_everything() {
        let (gov, _) = setup();
        let a = addr("a");
        gov.mint(&a, amt(50)).unwrap();
        gov.burn(&a, amt(20)).unwrap();
        gov.start_voting(&a, ONE_DAY, "s").unwrap();

        let summary = gov.summary().unwrap();
        assert_eq!(summary.total_supply, amt(30));
        assert_eq!(summary.max_minted, amt(50));
        assert_eq!(summary.total_burned, amt(20));
        assert_eq!(summary.accounts, 1);
        assert_eq!(summary.journal_entries, 2);
        assert_eq!(summary.votings, 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["accounts"], 1);
    }
}
