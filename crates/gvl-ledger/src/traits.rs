use gvl_types::{Address, Amount, Timestamp};

use crate::checkpoint::Checkpoint;
use crate::error::LedgerError;
use crate::event::JournalEntry;

/// Write boundary for balance mutations.
///
/// Every method is all-or-nothing: on error no balance, checkpoint, or
/// journal entry changes. `now` is the host clock signal and must not precede
/// the latest instant the ledger has already recorded.
pub trait LedgerWriter: Send + Sync {
    fn mint(
        &self,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError>;

    fn burn(
        &self,
        from: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError>;

    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError>;

    /// Drop the caller's stored checkpoints. Queries before `now` report zero
    /// afterwards; queries at or after `now` report the live balance.
    fn clear_account_history(
        &self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError>;
}

/// Read boundary for balance and history queries.
pub trait LedgerReader: Send + Sync {
    /// Balance of the last checkpoint at or before `at`; zero if none.
    fn balance_at(&self, account: &Address, at: Timestamp) -> Result<Amount, LedgerError>;

    /// Balance as of journal entry `seq`: the last checkpoint whose sequence
    /// number is at or below `seq`; zero if none. `seq == 0` is the empty
    /// ledger.
    fn balance_at_seq(&self, account: &Address, seq: u64) -> Result<Amount, LedgerError>;

    fn balance_of(&self, account: &Address) -> Result<Amount, LedgerError>;

    fn checkpoints(&self, account: &Address) -> Result<Vec<Checkpoint>, LedgerError>;

    /// Checkpoints with `from <= instant <= to`.
    fn checkpoints_between(
        &self,
        account: &Address,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Checkpoint>, LedgerError>;

    fn total_supply(&self) -> Result<Amount, LedgerError>;

    /// All-time minted total. Never decreases; burns do not affect it.
    fn max_minted(&self) -> Result<Amount, LedgerError>;

    fn total_burned(&self) -> Result<Amount, LedgerError>;

    /// Every account that has ever been touched, sorted.
    fn accounts(&self) -> Result<Vec<Address>, LedgerError>;

    fn journal(&self) -> Result<Vec<JournalEntry>, LedgerError>;

    /// Latest instant seen by any mutation.
    fn latest_instant(&self) -> Result<Option<Timestamp>, LedgerError>;

    /// Sequence number of the latest journal entry, or zero when empty.
    fn latest_seq(&self) -> Result<u64, LedgerError>;
}
