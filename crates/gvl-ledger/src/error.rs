use gvl_types::{Address, Amount, Timestamp};

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient balance in {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        account: Address,
        available: Amount,
        requested: Amount,
    },

    #[error("amount would overflow the 256-bit supply")]
    SupplyOverflow,

    #[error("clock regression: operation at {now} precedes latest ledger instant {latest}")]
    ClockRegression { latest: Timestamp, now: Timestamp },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("ledger lock poisoned: {0}")]
    LockPoisoned(String),
}
