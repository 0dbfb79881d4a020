//! Foundation types for the Governed Value Ledger (GVL).
//!
//! This crate provides the identity, value, and temporal types shared by the
//! ledger, the voting engine, and the SDK. Every other GVL crate depends on
//! `gvl-types`.
//!
//! # Key Types
//!
//! - [`Address`]: Opaque principal identity derived from identity material
//! - [`Amount`]: Unsigned 256-bit token amount
//! - [`Timestamp`]: Unix-epoch second count injected by the host environment

pub mod address;
pub mod amount;
pub mod error;
pub mod temporal;

pub use address::Address;
pub use amount::{parse_amount, percent_of, Amount};
pub use error::TypeError;
pub use temporal::Timestamp;
