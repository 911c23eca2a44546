//! ProcureChain Lifecycle Controller
//!
//! Drives a solicitation from publication to closeout and records each step
//! on its ledger.
//!
//! # Overview
//!
//! | State | Accepts | Moves to |
//! |-------|---------|----------|
//! | **Draft** | Publish | Open |
//! | **Open** | SubmitBid, CloseBidding | Open, Closed |
//! | **Closed** | EvaluateBids | Evaluated |
//! | **Evaluated** | AwardContract | Awarded |
//! | **Awarded** | SubmitDeliverable, AcceptDeliverable, CompletePerformance | Awarded, Completed |
//! | **Completed** | CloseOut | ClosedOut |
//! | **ClosedOut** | nothing | |
//!
//! Every accepted event is validated first and then sealed as one block,
//! attributed to the actor that performed it. Rejected events append nothing.
//!
//! # Usage
//!
//! ```no_run
//! use procurechain_domain::Actor;
//! use procurechain_lifecycle::{ProcurementConfig, ProcurementRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProcurementConfig::from_file("procurechain.toml")?;
//! let registry = ProcurementRegistry::new(config)?;
//! let officer = Actor::contracting_officer("CO_001")?;
//!
//! // let solicitation = registry.publish_solicitation(fields, officer.clone())?;
//! // registry.submit_bid(solicitation.id, bid)?;
//! // registry.close_bidding(solicitation.id, officer.clone())?;
//! // registry.evaluate_bids(solicitation.id)?;
//! // let award = registry.award_contract(solicitation.id, officer)?;
//! for id in registry.solicitation_ids()? {
//!     assert!(registry.verify_chain(id)?.ok);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod procurement;
mod registry;
pub mod transition;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, LedgerSettings, ProcurementConfig};
pub use error::{InvalidTransition, ProcurementError};
pub use procurement::Procurement;
pub use registry::ProcurementRegistry;
pub use transition::transition;
