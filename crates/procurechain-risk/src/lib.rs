//! ProcureChain Risk Engine
//!
//! Scores bids with an explainable, rule-based evaluator and selects the
//! award candidate.
//!
//! The risk engine provides:
//! - A fixed, ordered list of rules (hard compliance gates and soft signals)
//! - Additive scoring capped at the policy maximum
//! - Reasons in rule order, so every score can be reproduced and audited
//! - Winner selection over a total, deterministic ranking
//!
//! # Examples
//!
//! ```no_run
//! use procurechain_risk::{RiskEngine, RiskPolicy};
//!
//! let engine = RiskEngine::new(RiskPolicy::default());
//!
//! // Score every bid, then pick the winner
//! // let evaluated = engine.evaluate_all(&bids, &solicitation)?;
//! // let winner = engine.select_winner(&evaluated)?;
//! ```

#![warn(missing_docs)]

mod engine;
mod error;
mod policy;
mod rules;
mod selection;

pub use engine::{median_price, RiskAssessment, RiskEngine};
pub use error::{PolicyError, SelectionError};
pub use policy::RiskPolicy;
pub use rules::{Finding, Rule, RuleInput, RULES};
pub use selection::{rank_bids, select_winner, RankedBid};
