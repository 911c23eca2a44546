//! Risk engine error types

use procurechain_domain::BidId;
use thiserror::Error;

/// Errors that can occur during winner selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No bid survived compliance and threshold filtering
    ///
    /// A business outcome rather than a fault: the contracting officer
    /// decides manually.
    #[error("No eligible bid: {considered} considered, {disqualified} disqualified")]
    NoEligibleBid {
        /// Bids considered
        considered: usize,
        /// Bids filtered out
        disqualified: usize,
    },

    /// A bid reached selection without a risk evaluation
    #[error("Bid {0} has not been evaluated")]
    Unevaluated(BidId),
}

/// Policy configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A policy value is out of range or inconsistent
    #[error("Invalid risk policy: {0}")]
    Invalid(String),
}
