//! Deliverable module - work product submitted against an award

use crate::validation::{optional_digest, require_text};
use crate::{Award, AwardId, DeliverableId, SolicitationId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Caller-supplied fields for a new deliverable
#[derive(Debug, Clone, PartialEq)]
pub struct DeliverableFields {
    /// What was delivered
    pub description: String,

    /// SHA-256 digest of the delivered artifact
    pub document_hash: Option<String>,
}

/// Work product submitted against an awarded contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deliverable {
    /// Unique identifier
    pub id: DeliverableId,

    /// Award this deliverable fulfils
    pub award_id: AwardId,

    /// Solicitation the award belongs to
    pub solicitation_id: SolicitationId,

    /// What was delivered
    pub description: String,

    /// SHA-256 digest of the delivered artifact
    pub document_hash: Option<String>,

    /// When the deliverable was submitted
    pub submitted_at: Timestamp,

    /// Whether the agency accepted it
    pub accepted: bool,

    /// When it was accepted
    pub accepted_at: Option<Timestamp>,

    /// Notes recorded with the acceptance
    pub acceptance_notes: Option<String>,
}

impl Deliverable {
    /// Submit a deliverable against `award`
    pub fn submit(
        award: &Award,
        fields: DeliverableFields,
        submitted_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let description = require_text("description", &fields.description)?;
        let document_hash = optional_digest("document_hash", fields.document_hash.as_deref())?;

        if submitted_at < award.awarded_at {
            return Err(ValidationError::TimestampOrder {
                field: "submitted_at",
                earliest: award.awarded_at,
                actual: submitted_at,
            });
        }

        Ok(Self {
            id: DeliverableId::new(),
            award_id: award.id,
            solicitation_id: award.solicitation_id,
            description,
            document_hash,
            submitted_at,
            accepted: false,
            accepted_at: None,
            acceptance_notes: None,
        })
    }

    /// Return an accepted copy of this deliverable
    ///
    /// Acceptance cannot precede submission and happens at most once.
    pub fn accept(&self, accepted_at: Timestamp, notes: Option<String>) -> Result<Self, ValidationError> {
        if self.accepted {
            return Err(ValidationError::AlreadyAccepted(self.id.to_string()));
        }
        if accepted_at < self.submitted_at {
            return Err(ValidationError::TimestampOrder {
                field: "accepted_at",
                earliest: self.submitted_at,
                actual: accepted_at,
            });
        }

        let acceptance_notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            accepted: true,
            accepted_at: Some(accepted_at),
            acceptance_notes,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BidId, VendorId};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn award() -> Award {
        Award {
            id: AwardId::new(),
            solicitation_id: SolicitationId::new(),
            winning_bid_id: BidId::new(),
            winning_vendor_id: VendorId::new("VENDOR_ACME").unwrap(),
            award_amount: dec!(120000),
            winner_risk_score: 0,
            awarded_at: Utc.with_ymd_and_hms(2025, 11, 14, 12, 0, 0).unwrap(),
            justification: "Lowest-risk compliant bid".to_string(),
        }
    }

    fn fields() -> DeliverableFields {
        DeliverableFields {
            description: "Staffing plan and onboarding schedule".to_string(),
            document_hash: Some("0f".repeat(32)),
        }
    }

    #[test]
    fn test_submit_and_accept() {
        let award = award();
        let submitted_at = award.awarded_at + Duration::days(3);
        let deliverable = Deliverable::submit(&award, fields(), submitted_at).unwrap();

        assert_eq!(deliverable.award_id, award.id);
        assert_eq!(deliverable.solicitation_id, award.solicitation_id);
        assert!(!deliverable.accepted);

        let accepted = deliverable
            .accept(submitted_at + Duration::days(1), Some(" Meets requirements ".to_string()))
            .unwrap();
        assert!(accepted.accepted);
        assert_eq!(accepted.accepted_at, Some(submitted_at + Duration::days(1)));
        assert_eq!(accepted.acceptance_notes.as_deref(), Some("Meets requirements"));
    }

    #[test]
    fn test_submit_before_award_rejected() {
        let award = award();
        let result = Deliverable::submit(&award, fields(), award.awarded_at - Duration::seconds(1));
        assert!(matches!(
            result,
            Err(ValidationError::TimestampOrder { field: "submitted_at", .. })
        ));
    }

    #[test]
    fn test_accept_before_submission_rejected() {
        let award = award();
        let deliverable = Deliverable::submit(&award, fields(), award.awarded_at).unwrap();
        let result = deliverable.accept(award.awarded_at - Duration::seconds(1), None);
        assert!(matches!(
            result,
            Err(ValidationError::TimestampOrder { field: "accepted_at", .. })
        ));
    }

    #[test]
    fn test_accept_twice_rejected() {
        let award = award();
        let deliverable = Deliverable::submit(&award, fields(), award.awarded_at).unwrap();
        let accepted = deliverable.accept(award.awarded_at, None).unwrap();

        assert_eq!(
            accepted.accept(award.awarded_at, None),
            Err(ValidationError::AlreadyAccepted(deliverable.id.to_string()))
        );
    }
}
