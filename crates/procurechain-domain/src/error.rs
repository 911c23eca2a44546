//! Validation error types for the entity model

use crate::{LifecycleState, Timestamp};
use thiserror::Error;

/// Errors raised when a record fails validation at creation time
///
/// These are recoverable: the caller corrects the input and retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field value was malformed or out of range
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// Description of the issue
        reason: String,
    },

    /// Identifier could not be parsed
    #[error("Invalid {kind} identifier: {reason}")]
    InvalidId {
        /// Identifier kind
        kind: &'static str,
        /// Parser message
        reason: String,
    },

    /// Closing time does not follow publication
    #[error("Closing time {closing_at} must be after publication time {published_at}")]
    ClosingNotAfterPublication {
        /// Publication time
        published_at: Timestamp,
        /// Requested closing time
        closing_at: Timestamp,
    },

    /// Bid submitted outside the solicitation's open window
    #[error("Submission at {submitted_at} is outside the bidding window [{opens_at}, {closes_at})")]
    OutsideBiddingWindow {
        /// Submission time
        submitted_at: Timestamp,
        /// Window start (publication)
        opens_at: Timestamp,
        /// Window end (closing, exclusive)
        closes_at: Timestamp,
    },

    /// A timestamp precedes the event it must follow
    #[error("{field} at {actual} must not precede {earliest}")]
    TimestampOrder {
        /// Field being checked
        field: &'static str,
        /// Earliest permitted instant
        earliest: Timestamp,
        /// Supplied instant
        actual: Timestamp,
    },

    /// A referenced record does not exist in the supplied context
    #[error("Unknown {kind} reference: {id}")]
    UnknownReference {
        /// Referenced record kind
        kind: &'static str,
        /// Referenced identifier
        id: String,
    },

    /// Bid has no risk evaluation yet
    #[error("Bid {0} has not been evaluated")]
    Unevaluated(String),

    /// Deliverable was accepted already
    #[error("Deliverable {0} was already accepted")]
    AlreadyAccepted(String),

    /// Status change would move backwards
    #[error("Status cannot move from {from} to {to}")]
    StatusRegression {
        /// Current status
        from: LifecycleState,
        /// Requested status
        to: LifecycleState,
    },
}
