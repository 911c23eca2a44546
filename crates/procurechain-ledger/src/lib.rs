//! ProcureChain Ledger
//!
//! Append-only, hash-linked record of one solicitation's lifecycle.
//!
//! # Overview
//!
//! Every lifecycle event is sealed into a [`Block`] carrying a typed
//! [`Payload`]. Each block commits to:
//! - its position in the chain (index, starting at 0 for genesis)
//! - the SHA-256 of its canonical payload encoding
//! - the previous block's hash (64 zero digits for genesis)
//! - its timestamp
//! - the [`Actor`](procurechain_domain::Actor) that performed the event
//!
//! Changing any recorded byte breaks either the block's own hash or the link
//! from its successor, and [`Chain::validate`] reports the first index where
//! that happens. Nothing is ever repaired.
//!
//! # Export
//!
//! [`Chain::export`] produces [`BlockRecord`]s, a stable camelCase JSON
//! shape. [`Chain::from_records`] loads them back as-is, so an edited export
//! loads and is then reported by validation.
//!
//! # Usage
//!
//! ```no_run
//! use chrono::Utc;
//! use procurechain_domain::SolicitationId;
//! use procurechain_ledger::{Chain, GenesisRecord};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let genesis = GenesisRecord::new(SolicitationId::new(), "Ledger initialized");
//! let chain = Chain::new(genesis, Utc::now())?;
//!
//! assert!(chain.validate().ok);
//! println!("{}", chain.to_json()?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod block;
mod chain;
mod error;
pub mod hash;
mod payload;
mod sink;

pub use block::{Block, BlockRecord};
pub use chain::{Chain, Find, Validation};
pub use error::{IntegrityError, IntegrityIssue, LedgerError, SinkError};
pub use hash::ZERO_HASH;
pub use payload::{
    AcceptanceRecord, ClosingRecord, CloseoutRecord, EvaluationRecord, GenesisRecord, Payload,
    PayloadType, PROTOCOL_VERSION,
};
pub use sink::{BlockSink, MemorySink};
