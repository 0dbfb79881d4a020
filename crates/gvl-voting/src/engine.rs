use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use gvl_ledger::LedgerReader;
use gvl_types::{percent_of, Address, Amount, Timestamp};

use crate::config::{QuorumBasis, VotingConfig};
use crate::error::VotingError;
use crate::event::VotingEvent;
use crate::record::{
    ExecutionResult, Outcome, VoteRecord, VoteStatus, Voting, VotingId, VotingState,
};
use crate::registry::VotingRegistry;
use crate::tally::{transition, Tally};

// ---------------------------------------------------------------------------
// VotingEngine
// ---------------------------------------------------------------------------

/// Weighted voting over a history-aware ledger.
///
/// Vote weight is the voter's ledger balance at the voting's creation,
/// resolved against the ledger journal position recorded when the voting
/// opened so mutations later in the same second do not count. The engine
/// only reads the ledger; it never mutates balances.
pub struct VotingEngine<L: LedgerReader> {
    ledger: Arc<L>,
    config: VotingConfig,
    inner: RwLock<EngineState>,
}

#[derive(Default)]
struct EngineState {
    registry: VotingRegistry,
    events: Vec<VotingEvent>,
}

impl<L: LedgerReader> VotingEngine<L> {
    /// Create an engine over `ledger`. Fails if `config` is inconsistent.
    pub fn new(ledger: Arc<L>, config: VotingConfig) -> Result<Self, VotingError> {
        config.validate()?;
        Ok(Self {
            ledger,
            config,
            inner: RwLock::new(EngineState::default()),
        })
    }

    pub fn config(&self) -> &VotingConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// Open a new voting at `now` and return its sequential id.
    pub fn start_voting(
        &self,
        caller: &Address,
        duration_secs: u64,
        description: &str,
        now: Timestamp,
    ) -> Result<VotingId, VotingError> {
        self.check_duration(duration_secs)?;
        let closes_at = now.checked_add_secs(duration_secs).ok_or_else(|| {
            VotingError::InvalidArgument(format!(
                "voting window {now} + {duration_secs}s overflows"
            ))
        })?;
        if description.len() > self.config.max_description_len {
            return Err(VotingError::InvalidArgument(format!(
                "description is {} bytes, limit is {}",
                description.len(),
                self.config.max_description_len
            )));
        }

        let snapshot_seq = self.ledger.latest_seq()?;
        let mut state = self.write_state()?;
        let id = state.registry.create(
            *caller,
            now,
            snapshot_seq,
            duration_secs,
            description.to_owned(),
        );
        state.events.push(VotingEvent::Started {
            id,
            proposer: *caller,
            created_at: now,
            closes_at,
            description: description.to_owned(),
        });

        info!(%id, proposer = %caller, %closes_at, snapshot_seq, "voting started");
        Ok(id)
    }

    /// Cast, change, or withdraw (`VoteStatus::None`) the caller's vote.
    ///
    /// The first cast fixes the weight at the caller's balance as of the
    /// voting's `snapshot_seq`; later casts reuse it.
    pub fn vote(
        &self,
        caller: &Address,
        id: VotingId,
        status: VoteStatus,
        now: Timestamp,
    ) -> Result<VoteRecord, VotingError> {
        let mut state = self.write_state()?;

        let voting = state
            .registry
            .get(id)
            .ok_or(VotingError::VotingNotFound(id))?;
        if voting.executed {
            return Err(VotingError::VotingAlreadyExecuted(id));
        }
        if !voting.is_open(now) {
            return Err(VotingError::VotingClosed {
                id,
                closed_at: voting.closes_at(),
            });
        }
        if now < voting.created_at {
            return Err(VotingError::InvalidArgument(format!(
                "vote at {now} precedes creation of voting {id} at {}",
                voting.created_at
            )));
        }
        let snapshot_seq = voting.snapshot_seq;
        let tally = Tally::new(voting.total_accepted, voting.total_rejected);

        let previous = state.registry.vote_of(id, caller).copied();
        let (previous_status, weight) = match previous {
            Some(record) => (record.status, record.weight),
            None => (
                VoteStatus::None,
                self.ledger.balance_at_seq(caller, snapshot_seq)?,
            ),
        };

        let next = tally
            .apply(transition(previous_status, status), weight, weight)
            .ok_or(VotingError::TallyOverflow(id))?;

        let record = VoteRecord { status, weight };
        if let Some(voting) = state.registry.get_mut(id) {
            voting.total_accepted = next.accepted;
            voting.total_rejected = next.rejected;
        }
        state.registry.record_vote(id, *caller, record);
        state.events.push(VotingEvent::VoteCast {
            id,
            voter: *caller,
            status,
            weight,
            at: now,
        });

        debug!(
            %id,
            voter = %caller,
            from = %previous_status,
            to = %status,
            %weight,
            accepted = %next.accepted,
            rejected = %next.rejected,
            "vote recorded"
        );
        Ok(record)
    }

    /// Finalize a voting whose window has elapsed.
    ///
    /// Sets `executed` regardless of outcome; totals are left as they are.
    pub fn execute_voting(
        &self,
        id: VotingId,
        now: Timestamp,
    ) -> Result<ExecutionResult, VotingError> {
        let mut state = self.write_state()?;

        let voting = state
            .registry
            .get(id)
            .ok_or(VotingError::VotingNotFound(id))?;
        if voting.executed {
            return Err(VotingError::VotingAlreadyExecuted(id));
        }
        if voting.is_open(now) {
            return Err(VotingError::VotingStillOpen {
                id,
                closes_at: voting.closes_at(),
            });
        }

        let participation = voting
            .participation()
            .ok_or(VotingError::TallyOverflow(id))?;
        let quorum = self.quorum()?;
        let outcome = decide(voting.total_accepted, voting.total_rejected, participation, quorum);
        let (total_accepted, total_rejected) = (voting.total_accepted, voting.total_rejected);

        if let Some(voting) = state.registry.get_mut(id) {
            voting.executed = true;
            voting.outcome = Some(outcome);
        }
        state.events.push(VotingEvent::Executed {
            id,
            outcome,
            total_accepted,
            total_rejected,
            quorum,
            at: now,
        });

        info!(%id, %outcome, %participation, %quorum, "voting executed");
        Ok(ExecutionResult {
            id,
            outcome,
            participation,
            quorum,
        })
    }

    /// Snapshot of a voting.
    pub fn get_voting(&self, id: VotingId) -> Result<Voting, VotingError> {
        self.read_state()?
            .registry
            .get(id)
            .cloned()
            .ok_or(VotingError::VotingNotFound(id))
    }

    pub fn voting_count(&self) -> Result<usize, VotingError> {
        Ok(self.read_state()?.registry.len())
    }

    /// Every voting, in id order.
    pub fn votings(&self) -> Result<Vec<Voting>, VotingError> {
        Ok(self.read_state()?.registry.iter().cloned().collect())
    }

    /// The caller's current record for a voting, if they ever cast one.
    pub fn vote_of(
        &self,
        id: VotingId,
        voter: &Address,
    ) -> Result<Option<VoteRecord>, VotingError> {
        let state = self.read_state()?;
        if state.registry.get(id).is_none() {
            return Err(VotingError::VotingNotFound(id));
        }
        Ok(state.registry.vote_of(id, voter).copied())
    }

    /// All recorded votes of a voting, sorted by voter.
    pub fn votes(&self, id: VotingId) -> Result<Vec<(Address, VoteRecord)>, VotingError> {
        let state = self.read_state()?;
        if state.registry.get(id).is_none() {
            return Err(VotingError::VotingNotFound(id));
        }
        Ok(state.registry.votes_for(id))
    }

    pub fn state(&self, id: VotingId, now: Timestamp) -> Result<VotingState, VotingError> {
        Ok(self.get_voting(id)?.state(now))
    }

    pub fn events(&self) -> Result<Vec<VotingEvent>, VotingError> {
        Ok(self.read_state()?.events.clone())
    }

    /// Quorum threshold against the current ledger state.
    pub fn quorum(&self) -> Result<Amount, VotingError> {
        let basis = match self.config.quorum_basis {
            QuorumBasis::LifetimeMinted => self.ledger.max_minted()?,
            QuorumBasis::LiveSupply => self.ledger.total_supply()?,
        };
        Ok(percent_of(basis, self.config.quorum_percent))
    }

    fn check_duration(&self, duration_secs: u64) -> Result<(), VotingError> {
        let (min, max) = (self.config.min_duration_secs, self.config.max_duration_secs);
        if duration_secs == 0 || duration_secs < min || duration_secs > max {
            return Err(VotingError::InvalidArgument(format!(
                "duration {duration_secs}s outside [{min}s, {max}s]"
            )));
        }
        Ok(())
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, EngineState>, VotingError> {
        self.inner
            .read()
            .map_err(|e| VotingError::LockPoisoned(e.to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, EngineState>, VotingError> {
        self.inner
            .write()
            .map_err(|e| VotingError::LockPoisoned(e.to_string()))
    }
}

/// Quorum gate first, then strict majority; ties reject.
fn decide(accepted: Amount, rejected: Amount, participation: Amount, quorum: Amount) -> Outcome {
    if participation < quorum {
        Outcome::NotApplied
    } else if accepted > rejected {
        Outcome::Accepted
    } else {
        Outcome::Rejected
    }
}
