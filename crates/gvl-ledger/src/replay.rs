use std::collections::BTreeMap;

use gvl_types::{Address, Amount};

use crate::error::LedgerError;
use crate::event::{JournalEntry, LedgerEvent};
use crate::traits::LedgerReader;

/// Balances reconstructed by folding the mutation journal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub applied_events: u64,
    pub balances: BTreeMap<Address, Amount>,
    pub total_supply: Amount,
    pub max_minted: Amount,
}

/// Deterministic replay of a ledger journal.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Rebuild balances from the reader's journal, starting at genesis.
    pub fn replay_from_genesis<R: LedgerReader>(reader: &R) -> Result<ReplayResult, LedgerError> {
        let journal = reader.journal()?;
        apply_entries(&journal)
    }

    /// Returns `true` if replaying the journal reproduces every live balance,
    /// the supply, and the lifetime minted total.
    pub fn verify_convergence<R: LedgerReader>(reader: &R) -> Result<bool, LedgerError> {
        let replayed = Self::replay_from_genesis(reader)?;

        let mut live = BTreeMap::new();
        for account in reader.accounts()? {
            live.insert(account, reader.balance_of(&account)?);
        }

        Ok(replayed.balances == live
            && replayed.total_supply == reader.total_supply()?
            && replayed.max_minted == reader.max_minted()?)
    }
}

fn apply_entries(entries: &[JournalEntry]) -> Result<ReplayResult, LedgerError> {
    let mut balances: BTreeMap<Address, Amount> = BTreeMap::new();
    let mut total_supply = Amount::zero();
    let mut max_minted = Amount::zero();

    for entry in entries {
        match &entry.event {
            LedgerEvent::Minted { to, amount } => {
                let balance = balances.entry(*to).or_default();
                *balance = balance
                    .checked_add(*amount)
                    .ok_or(LedgerError::SupplyOverflow)?;
                total_supply = total_supply
                    .checked_add(*amount)
                    .ok_or(LedgerError::SupplyOverflow)?;
                max_minted = max_minted
                    .checked_add(*amount)
                    .ok_or(LedgerError::SupplyOverflow)?;
            }
            LedgerEvent::Burned { from, amount } => {
                debit(&mut balances, from, *amount)?;
                total_supply = total_supply
                    .checked_sub(*amount)
                    .ok_or(LedgerError::SupplyOverflow)?;
            }
            LedgerEvent::Transferred { from, to, amount } => {
                debit(&mut balances, from, *amount)?;
                let balance = balances.entry(*to).or_default();
                *balance = balance
                    .checked_add(*amount)
                    .ok_or(LedgerError::SupplyOverflow)?;
            }
            LedgerEvent::HistoryCleared { account, .. } => {
                balances.entry(*account).or_default();
            }
        }
    }

    Ok(ReplayResult {
        applied_events: entries.len() as u64,
        balances,
        total_supply,
        max_minted,
    })
}

fn debit(
    balances: &mut BTreeMap<Address, Amount>,
    account: &Address,
    amount: Amount,
) -> Result<(), LedgerError> {
    let balance = balances.entry(*account).or_default();
    *balance = balance
        .checked_sub(amount)
        .ok_or(LedgerError::InsufficientBalance {
            account: *account,
            available: *balance,
            requested: amount,
        })?;
    Ok(())
}
