use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use gvl_types::{Address, Amount, Timestamp};

use crate::checkpoint::{Checkpoint, CheckpointHistory};
use crate::error::LedgerError;
use crate::event::{JournalEntry, LedgerEvent};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for tests, local demos, and embedding.
///
/// All state sits behind one `RwLock`. Each mutation holds the write lock for
/// its whole validate-then-apply step, so readers never observe a balance
/// without its checkpoint or journal entry.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Address, AccountState>,
    total_supply: Amount,
    max_minted: Amount,
    total_burned: Amount,
    latest_instant: Option<Timestamp>,
    journal: Vec<JournalEntry>,
}

#[derive(Clone, Debug, Default)]
struct AccountState {
    balance: Amount,
    history: CheckpointHistory,
}

impl LedgerState {
    fn balance_of(&self, account: &Address) -> Amount {
        self.accounts
            .get(account)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    fn check_clock(&self, now: Timestamp) -> Result<(), LedgerError> {
        match self.latest_instant {
            Some(latest) if now < latest => Err(LedgerError::ClockRegression { latest, now }),
            _ => Ok(()),
        }
    }

    fn require_balance(&self, account: &Address, amount: Amount) -> Result<Amount, LedgerError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *account,
                available,
                requested: amount,
            });
        }
        Ok(available - amount)
    }

    /// Sequence number the next journal entry will carry.
    fn next_seq(&self) -> u64 {
        self.journal.len() as u64 + 1
    }

    /// Set the live balance and append the matching checkpoint, stamped with
    /// the sequence number of the journal entry about to be appended.
    fn record(&mut self, account: &Address, balance: Amount, now: Timestamp) {
        let seq = self.next_seq();
        let entry = self.accounts.entry(*account).or_default();
        entry.balance = balance;
        entry.history.push(now, seq, balance);
    }

    fn append(&mut self, event: LedgerEvent, now: Timestamp) -> JournalEntry {
        let entry = JournalEntry {
            seq: self.next_seq(),
            at: now,
            event,
        };
        self.journal.push(entry.clone());
        self.latest_instant = Some(now);
        entry
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LedgerState::default()),
        }
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .read()
            .map_err(|e| LedgerError::LockPoisoned(e.to_string()))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, LedgerState>, LedgerError> {
        self.inner
            .write()
            .map_err(|e| LedgerError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn mint(
        &self,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write_state()?;
        state.check_clock(now)?;

        let total_supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        let max_minted = state
            .max_minted
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        // Bounded by total_supply, which did not overflow.
        let balance = state.balance_of(to) + amount;

        state.total_supply = total_supply;
        state.max_minted = max_minted;
        state.record(to, balance, now);
        debug!(account = %to, %amount, %balance, at = %now, "mint applied");

        Ok(state.append(LedgerEvent::Minted { to: *to, amount }, now))
    }

    fn burn(
        &self,
        from: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write_state()?;
        state.check_clock(now)?;

        let balance = state.require_balance(from, amount)?;
        let total_burned = state
            .total_burned
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;

        state.total_supply = state.total_supply - amount;
        state.total_burned = total_burned;
        state.record(from, balance, now);
        debug!(account = %from, %amount, %balance, at = %now, "burn applied");

        Ok(state.append(LedgerEvent::Burned { from: *from, amount }, now))
    }

    fn transfer(
        &self,
        from: &Address,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write_state()?;
        state.check_clock(now)?;

        let from_balance = state.require_balance(from, amount)?;

        if from == to {
            // Balance is unchanged but the timeline still gets one entry.
            let balance = state.balance_of(from);
            state.record(from, balance, now);
        } else {
            let to_balance = state.balance_of(to) + amount;
            state.record(from, from_balance, now);
            state.record(to, to_balance, now);
        }
        debug!(from = %from, to = %to, %amount, at = %now, "transfer applied");

        Ok(state.append(
            LedgerEvent::Transferred {
                from: *from,
                to: *to,
                amount,
            },
            now,
        ))
    }

    fn clear_account_history(
        &self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<JournalEntry, LedgerError> {
        let mut state = self.write_state()?;
        state.check_clock(now)?;

        let seq = state.next_seq();
        let entry = state.accounts.entry(*caller).or_default();
        let balance = entry.balance;
        let dropped = entry.history.len();
        entry.history.reset_to(now, seq, balance);
        debug!(account = %caller, dropped, %balance, at = %now, "account history cleared");

        Ok(state.append(
            LedgerEvent::HistoryCleared {
                account: *caller,
                balance,
            },
            now,
        ))
    }
}

impl LedgerReader for InMemoryLedger {
    fn balance_at(&self, account: &Address, at: Timestamp) -> Result<Amount, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .accounts
            .get(account)
            .map(|a| a.history.balance_at(at))
            .unwrap_or_default())
    }

    fn balance_at_seq(&self, account: &Address, seq: u64) -> Result<Amount, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .accounts
            .get(account)
            .map(|a| a.history.balance_at_seq(seq))
            .unwrap_or_default())
    }

    fn balance_of(&self, account: &Address) -> Result<Amount, LedgerError> {
        Ok(self.read_state()?.balance_of(account))
    }

    fn checkpoints(&self, account: &Address) -> Result<Vec<Checkpoint>, LedgerError> {
        let state = self.read_state()?;
        Ok(state
            .accounts
            .get(account)
            .map(|a| a.history.as_slice().to_vec())
            .unwrap_or_default())
    }

    fn checkpoints_between(
        &self,
        account: &Address,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Checkpoint>, LedgerError> {
        if from > to {
            return Err(LedgerError::InvalidArgument(format!(
                "range start {from} is after range end {to}"
            )));
        }
        let state = self.read_state()?;
        Ok(state
            .accounts
            .get(account)
            .map(|a| a.history.range(from, to).to_vec())
            .unwrap_or_default())
    }

    fn total_supply(&self) -> Result<Amount, LedgerError> {
        Ok(self.read_state()?.total_supply)
    }

    fn max_minted(&self) -> Result<Amount, LedgerError> {
        Ok(self.read_state()?.max_minted)
    }

    fn total_burned(&self) -> Result<Amount, LedgerError> {
        Ok(self.read_state()?.total_burned)
    }

    fn accounts(&self) -> Result<Vec<Address>, LedgerError> {
        let state = self.read_state()?;
        let mut accounts: Vec<_> = state.accounts.keys().copied().collect();
        accounts.sort();
        Ok(accounts)
    }

    fn journal(&self) -> Result<Vec<JournalEntry>, LedgerError> {
        Ok(self.read_state()?.journal.clone())
    }

    fn latest_instant(&self) -> Result<Option<Timestamp>, LedgerError> {
        Ok(self.read_state()?.latest_instant)
    }

    fn latest_seq(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.journal.len() as u64)
    }
}
