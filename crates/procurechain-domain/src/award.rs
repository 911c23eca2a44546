//! Award module - the recorded outcome of an evaluated solicitation

use crate::{AwardId, Bid, BidId, Money, Solicitation, SolicitationId, Timestamp, ValidationError, VendorId};
use serde::{Deserialize, Serialize};

/// The recorded contract award
///
/// The justification is derived from the winner's risk reasons so the
/// award explains itself without consulting the evaluation block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    /// Unique identifier
    pub id: AwardId,

    /// Awarded solicitation
    pub solicitation_id: SolicitationId,

    /// Winning bid
    pub winning_bid_id: BidId,

    /// Winning vendor
    pub winning_vendor_id: VendorId,

    /// Contract value (the winning bid's price)
    pub award_amount: Money,

    /// Winner's risk score at evaluation time
    pub winner_risk_score: u8,

    /// When the award was issued
    pub awarded_at: Timestamp,

    /// Explanation derived from the winner's risk reasons
    pub justification: String,
}

impl Award {
    /// Issue an award for `winning_bid_id`
    ///
    /// `bids` is the caller's context: the winning bid must be among them,
    /// belong to `solicitation`, and carry an evaluation.
    pub fn issue(
        solicitation: &Solicitation,
        bids: &[Bid],
        winning_bid_id: BidId,
        awarded_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let winner = bids
            .iter()
            .find(|b| b.id == winning_bid_id && b.solicitation_id == solicitation.id)
            .ok_or_else(|| ValidationError::UnknownReference {
                kind: "bid",
                id: winning_bid_id.to_string(),
            })?;

        let score = winner
            .risk_score
            .ok_or_else(|| ValidationError::Unevaluated(winner.id.to_string()))?;

        if awarded_at < winner.submitted_at {
            return Err(ValidationError::TimestampOrder {
                field: "awarded_at",
                earliest: winner.submitted_at,
                actual: awarded_at,
            });
        }

        Ok(Self {
            id: AwardId::new(),
            solicitation_id: solicitation.id,
            winning_bid_id: winner.id,
            winning_vendor_id: winner.vendor_id.clone(),
            award_amount: winner.price,
            winner_risk_score: score,
            awarded_at,
            justification: justification(score, &winner.risk_reasons),
        })
    }
}

fn justification(score: u8, reasons: &[String]) -> String {
    if reasons.is_empty() {
        format!("Lowest-risk compliant bid (risk score {}); no risk findings", score)
    } else {
        format!(
            "Lowest-risk compliant bid (risk score {}); findings: {}",
            score,
            reasons.join("; ")
        )
    }
}
