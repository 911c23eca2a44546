//! Ledger error types

use procurechain_domain::Timestamp;
use thiserror::Error;

/// What went wrong at an invalid block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// Block sits at a position other than its recorded index
    IndexMismatch {
        /// Position in the chain
        expected: u64,
        /// Recorded index
        actual: u64,
    },

    /// Previous-hash link does not match the preceding block
    BrokenLink {
        /// Hash of the preceding block (zero hash for genesis)
        expected: String,
        /// Recorded previous hash
        actual: String,
    },

    /// Recorded payload hash does not match the payload
    PayloadHashMismatch {
        /// Recomputed hash
        expected: String,
        /// Recorded hash
        actual: String,
    },

    /// Recorded block hash does not match the block fields
    BlockHashMismatch {
        /// Recomputed hash
        expected: String,
        /// Recorded hash
        actual: String,
    },

    /// Payload could not be re-encoded for hashing
    Unhashable(String),
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::IndexMismatch { expected, actual } => {
                write!(f, "index mismatch: expected {}, found {}", expected, actual)
            }
            IntegrityIssue::BrokenLink { expected, actual } => {
                write!(f, "broken link: expected previous hash '{}', found '{}'", expected, actual)
            }
            IntegrityIssue::PayloadHashMismatch { expected, actual } => {
                write!(f, "payload hash mismatch: expected '{}', found '{}'", expected, actual)
            }
            IntegrityIssue::BlockHashMismatch { expected, actual } => {
                write!(f, "block hash mismatch: expected '{}', found '{}'", expected, actual)
            }
            IntegrityIssue::Unhashable(reason) => write!(f, "payload not hashable: {}", reason),
        }
    }
}

/// A chain failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Chain integrity violated at block {index}: {issue}")]
pub struct IntegrityError {
    /// First invalid block
    pub index: u64,

    /// What was wrong with it
    pub issue: IntegrityIssue,
}

/// Errors from building, appending to, or importing a chain
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Block timestamp earlier than the current tail's
    #[error("Timestamp {attempted} precedes tail block {index} at {tail}")]
    TimestampRegression {
        /// Tail block index
        index: u64,
        /// Tail block timestamp
        tail: Timestamp,
        /// Rejected timestamp
        attempted: Timestamp,
    },

    /// Import given no records
    #[error("Cannot load a chain from zero records")]
    EmptyChain,

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An imported record could not be decoded
    #[error("Cannot decode record {index}: {reason}")]
    Decode {
        /// Record index as given
        index: u64,
        /// What failed
        reason: String,
    },
}

/// Errors reported by a block sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink refused or failed to take the record
    #[error("Sink rejected block {index}: {reason}")]
    Rejected {
        /// Block index
        index: u64,
        /// Sink-specific reason
        reason: String,
    },

    /// The sink's internal state is unusable
    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}
