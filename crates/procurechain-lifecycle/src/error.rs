//! Error types for lifecycle operations

use crate::ConfigError;
use procurechain_domain::{LifecycleEvent, LifecycleState, SolicitationId, ValidationError};
use procurechain_ledger::{IntegrityError, LedgerError};
use procurechain_risk::SelectionError;
use thiserror::Error;

/// An event that the current state does not accept
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Event {event} is not permitted in state {state}")]
pub struct InvalidTransition {
    /// State the procurement was in
    pub state: LifecycleState,

    /// Event that was attempted
    pub event: LifecycleEvent,
}

/// Errors that can occur during procurement operations
#[derive(Error, Debug)]
pub enum ProcurementError {
    /// Malformed or out-of-window input
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Event inconsistent with the lifecycle state
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// Winner selection could not produce an award
    #[error("Selection failed: {0}")]
    Selection(#[from] SelectionError),

    /// A chain failed validation
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// Append or import failure in the ledger
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A chain's blocks do not describe a legal lifecycle
    #[error("Cannot replay block {index}: {reason}")]
    Replay {
        /// Offending block
        index: u64,
        /// What was wrong
        reason: String,
    },

    /// Unknown identifier
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Record kind
        kind: &'static str,
        /// Identifier as given
        id: String,
    },

    /// An import named a solicitation the registry already holds
    #[error("Solicitation {0} is already registered")]
    AlreadyRegistered(SolicitationId),

    /// A lock was poisoned by a panicking thread
    #[error("Lock poisoned: {0}")]
    Poisoned(&'static str),
}

impl ProcurementError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        ProcurementError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
