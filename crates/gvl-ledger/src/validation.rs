use gvl_types::{Address, Amount};

use crate::error::LedgerError;
use crate::traits::LedgerReader;

/// Result of auditing a ledger's balances and histories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub account_count: u64,
    pub checkpoint_count: u64,
    pub histories_monotonic: bool,
    pub live_balances_checkpointed: bool,
    pub supply_conserved: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant violation detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// `None` for ledger-wide violations.
    pub account: Option<Address>,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// A checkpoint instant or sequence number is out of order.
    HistoryOutOfOrder,
    /// The live balance differs from the latest checkpoint.
    LiveBalanceMismatch,
    /// Sum of live balances differs from the recorded supply.
    SupplyMismatch,
    /// Supply differs from lifetime minted minus burned.
    ConservationBroken,
}

/// Ledger invariant auditor.
pub struct HistoryValidator;

impl HistoryValidator {
    /// Check every account history and the ledger-wide conservation law.
    pub fn validate<R: LedgerReader>(reader: &R) -> Result<ValidationReport, LedgerError> {
        let accounts = reader.accounts()?;
        let mut violations = Vec::new();
        let mut histories_monotonic = true;
        let mut live_balances_checkpointed = true;
        let mut supply_conserved = true;
        let mut checkpoint_count = 0u64;
        let mut live_sum = Amount::zero();

        for account in &accounts {
            let history = reader.checkpoints(account)?;
            let live = reader.balance_of(account)?;
            checkpoint_count += history.len() as u64;

            for pair in history.windows(2) {
                if pair[1].instant < pair[0].instant || pair[1].seq <= pair[0].seq {
                    histories_monotonic = false;
                    violations.push(Violation {
                        account: Some(*account),
                        kind: ViolationKind::HistoryOutOfOrder,
                        description: format!(
                            "checkpoint #{} at {} follows checkpoint #{} at {}",
                            pair[1].seq, pair[1].instant, pair[0].seq, pair[0].instant
                        ),
                    });
                }
            }

            let recorded = history.last().map(|c| c.balance).unwrap_or_default();
            if recorded != live {
                live_balances_checkpointed = false;
                violations.push(Violation {
                    account: Some(*account),
                    kind: ViolationKind::LiveBalanceMismatch,
                    description: format!("live balance {live}, latest checkpoint {recorded}"),
                });
            }

            live_sum = match live_sum.checked_add(live) {
                Some(sum) => sum,
                None => {
                    supply_conserved = false;
                    violations.push(Violation {
                        account: Some(*account),
                        kind: ViolationKind::SupplyMismatch,
                        description: "sum of live balances overflows".into(),
                    });
                    live_sum
                }
            };
        }

        let total_supply = reader.total_supply()?;
        if live_sum != total_supply {
            supply_conserved = false;
            violations.push(Violation {
                account: None,
                kind: ViolationKind::SupplyMismatch,
                description: format!("live balances sum to {live_sum}, supply is {total_supply}"),
            });
        }

        let minted = reader.max_minted()?;
        let burned = reader.total_burned()?;
        if minted.checked_sub(burned) != Some(total_supply) {
            supply_conserved = false;
            violations.push(Violation {
                account: None,
                kind: ViolationKind::ConservationBroken,
                description: format!(
                    "minted {minted} minus burned {burned} does not equal supply {total_supply}"
                ),
            });
        }

        Ok(ValidationReport {
            account_count: accounts.len() as u64,
            checkpoint_count,
            histories_monotonic,
            live_balances_checkpointed,
            supply_conserved,
            violations,
        })
    }
}
