//! Checkpointed balance ledger for the Governed Value Ledger (GVL).
//!
//! This crate owns live balances and the per-account history that makes
//! point-in-time queries possible. It provides:
//! - [`CheckpointHistory`], an append-only `(instant, balance)` timeline with
//!   binary-search point and range lookups
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger` implementation for tests and embedding
//! - A mutation journal, history validation, and deterministic replay

pub mod checkpoint;
pub mod error;
pub mod event;
pub mod memory;
pub mod replay;
pub mod traits;
pub mod validation;

pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use error::LedgerError;
pub use event::{JournalEntry, LedgerEvent};
pub use memory::InMemoryLedger;
pub use replay::{ReplayEngine, ReplayResult};
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{HistoryValidator, ValidationReport, Violation, ViolationKind};
