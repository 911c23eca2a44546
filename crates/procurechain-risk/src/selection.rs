//! Winner selection
//!
//! Eligible bids are compliant and score at or below the disqualification
//! threshold. They are ordered by risk score, then price, then submission
//! time, then bid id, which makes the ranking total.

use crate::{RiskPolicy, SelectionError};
use procurechain_domain::Bid;
use std::cmp::Ordering;

/// One bid's place in the ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedBid<'a> {
    /// The evaluated bid
    pub bid: &'a Bid,

    /// Its risk score
    pub score: u8,

    /// Whether it may receive the award
    pub eligible: bool,

    /// Why it was disqualified, if it was
    pub disqualification: Option<String>,
}

/// Rank every bid, eligible bids first in award order
///
/// Disqualified bids follow, ordered the same way. Fails if any bid has not
/// been evaluated.
pub fn rank_bids<'a>(
    bids: &'a [Bid],
    policy: &RiskPolicy,
) -> Result<Vec<RankedBid<'a>>, SelectionError> {
    let mut ranked = bids
        .iter()
        .map(|bid| {
            let (score, compliance_pass) = match (bid.risk_score, bid.compliance_pass) {
                (Some(score), Some(pass)) => (score, pass),
                _ => return Err(SelectionError::Unevaluated(bid.id)),
            };

            let disqualification = if !compliance_pass {
                Some("Failed compliance gate".to_string())
            } else if score > policy.disqualification_threshold {
                Some(format!(
                    "Risk score {} exceeds threshold {}",
                    score, policy.disqualification_threshold
                ))
            } else {
                None
            };

            Ok(RankedBid {
                bid,
                score,
                eligible: disqualification.is_none(),
                disqualification,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    ranked.sort_by(|a, b| {
        b.eligible
            .cmp(&a.eligible)
            .then_with(|| award_order(a, b))
    });

    Ok(ranked)
}

/// Pick the lowest-risk eligible bid
pub fn select_winner<'a>(bids: &'a [Bid], policy: &RiskPolicy) -> Result<&'a Bid, SelectionError> {
    let ranked = rank_bids(bids, policy)?;

    match ranked.first() {
        Some(top) if top.eligible => {
            tracing::debug!(
                bid_id = %top.bid.id,
                vendor_id = %top.bid.vendor_id,
                score = top.score,
                "Winner selected"
            );
            Ok(top.bid)
        }
        _ => {
            let disqualified = ranked.iter().filter(|r| !r.eligible).count();
            tracing::warn!(
                considered = ranked.len(),
                disqualified,
                "No eligible bid"
            );
            Err(SelectionError::NoEligibleBid {
                considered: ranked.len(),
                disqualified,
            })
        }
    }
}

fn award_order(a: &RankedBid<'_>, b: &RankedBid<'_>) -> Ordering {
    a.score
        .cmp(&b.score)
        .then_with(|| a.bid.price.cmp(&b.bid.price))
        .then_with(|| a.bid.submitted_at.cmp(&b.bid.submitted_at))
        .then_with(|| a.bid.id.cmp(&b.bid.id))
}
