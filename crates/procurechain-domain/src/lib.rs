//! ProcureChain Domain Layer
//!
//! This crate contains the entity model for the procurement ledger. It defines
//! the lifecycle records and the validated constructors that every other
//! layer depends upon. It performs no I/O and holds no mutable global state.
//!
//! ## Key Concepts
//!
//! - **Solicitation**: A published request for bids with an open window
//! - **Bid**: A vendor's offer, carrying compliance attributes and, once
//!   evaluated, a risk score with ordered reasons
//! - **Award**: The single recorded outcome selecting a winning bid
//! - **Deliverable**: Work product submitted against an award and accepted
//! - **Actor**: The role and identifier recorded against every event
//! - **Lifecycle state**: Draft → Open → Closed → Evaluated → Awarded →
//!   Completed → ClosedOut, advancing forward only
//!
//! ## Architecture
//!
//! - Constructors validate at creation time and return immutable values
//! - Changes produce new values (`with_status`, `with_evaluation`, `accept`)
//! - Referenced records are passed in by the caller as context; the domain
//!   never looks anything up on its own

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod actor;
pub mod award;
pub mod bid;
pub mod deliverable;
pub mod error;
pub mod id;
pub mod solicitation;
pub mod state;
pub mod validation;

// Re-exports for convenience
pub use actor::{Actor, ActorRole};
pub use award::Award;
pub use bid::{Bid, BidFields, ComplianceAttributes};
pub use deliverable::{Deliverable, DeliverableFields};
pub use error::ValidationError;
pub use id::{AwardId, BidId, DeliverableId, SolicitationId, VendorId};
pub use solicitation::{Solicitation, SolicitationFields};
pub use state::{LifecycleEvent, LifecycleState};

/// UTC timestamp used for every recorded instant
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Exact decimal money amount
pub type Money = rust_decimal::Decimal;
