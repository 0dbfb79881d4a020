//! Weighted governance voting for the Governed Value Ledger.
//!
//! A voting is opened by a proposer, accepts votes for a fixed window, and is
//! executed once the window has elapsed. Each voter's weight is their ledger
//! balance at the instant the voting was created, so tokens moved or minted
//! afterwards cannot swing the result.
//!
//! Execution applies a participation quorum (20% of the lifetime minted
//! supply by default) and then a strict majority; ties reject.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use gvl_ledger::{InMemoryLedger, LedgerWriter};
//! use gvl_types::{Address, Amount, Timestamp};
//! use gvl_voting::{Outcome, VoteStatus, VotingConfig, VotingEngine};
//!
//! let ledger = Arc::new(InMemoryLedger::new());
//! let alice = Address::from_label("alice");
//! ledger.mint(&alice, Amount::from(100u64), Timestamp::from_secs(1)).unwrap();
//!
//! let engine = VotingEngine::new(Arc::clone(&ledger), VotingConfig::default()).unwrap();
//! let id = engine.start_voting(&alice, 60, "raise cap", Timestamp::from_secs(2)).unwrap();
//! engine.vote(&alice, id, VoteStatus::Accept, Timestamp::from_secs(3)).unwrap();
//!
//! let result = engine.execute_voting(id, Timestamp::from_secs(62)).unwrap();
//! assert_eq!(result.outcome, Outcome::Accepted);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod record;
pub mod registry;
pub mod tally;

pub use config::{QuorumBasis, VotingConfig};
pub use engine::VotingEngine;
pub use error::VotingError;
pub use event::VotingEvent;
pub use record::{ExecutionResult, Outcome, VoteRecord, VoteStatus, Voting, VotingId, VotingState};
pub use registry::VotingRegistry;
pub use tally::{transition, Side, Tally, Transition};
