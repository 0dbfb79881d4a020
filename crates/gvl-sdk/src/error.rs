use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("ledger error: {0}")]
    Ledger(#[from] gvl_ledger::LedgerError),

    #[error("voting error: {0}")]
    Voting(#[from] gvl_voting::VotingError),
}

pub type SdkResult<T> = Result<T, SdkError>;
