//! Solicitation module - the published request that anchors a lifecycle

use crate::validation::{require_entries, require_naics, require_positive, require_text};
use crate::{LifecycleState, Money, SolicitationId, Timestamp, ValidationError};
use serde::{Deserialize, Serialize};

/// Caller-supplied fields for a new solicitation
#[derive(Debug, Clone, PartialEq)]
pub struct SolicitationFields {
    /// Issuing agency
    pub agency_name: String,

    /// Short title
    pub title: String,

    /// NAICS classification code
    pub naics: String,

    /// Statement-of-work requirements
    pub requirements: Vec<String>,

    /// Certifications every bidder must hold
    pub required_certifications: Vec<String>,

    /// Independent government estimate, used as the pricing baseline
    pub estimated_value: Option<Money>,

    /// When bidding closes (exclusive)
    pub closing_at: Timestamp,
}

/// A government request for bids
///
/// Values are immutable; status changes produce a new value through
/// [`Solicitation::with_status`], which only moves forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solicitation {
    /// Unique identifier
    pub id: SolicitationId,

    /// Issuing agency
    pub agency_name: String,

    /// Short title
    pub title: String,

    /// NAICS classification code
    pub naics: String,

    /// Statement-of-work requirements
    pub requirements: Vec<String>,

    /// Certifications every bidder must hold
    pub required_certifications: Vec<String>,

    /// Pricing baseline, if the agency published one
    pub estimated_value: Option<Money>,

    /// When the solicitation was published (window opens)
    pub published_at: Timestamp,

    /// When bidding closes (window end, exclusive)
    pub closing_at: Timestamp,

    /// Current lifecycle status
    pub status: LifecycleState,
}

impl Solicitation {
    /// Create a draft solicitation
    ///
    /// `published_at` is the instant the solicitation will open; the closing
    /// time must come strictly after it.
    pub fn draft(fields: SolicitationFields, published_at: Timestamp) -> Result<Self, ValidationError> {
        let agency_name = require_text("agency_name", &fields.agency_name)?;
        let title = require_text("title", &fields.title)?;
        let naics = require_naics("naics", &fields.naics)?;
        let requirements = require_entries("requirements", &fields.requirements)?;
        let required_certifications =
            require_entries("required_certifications", &fields.required_certifications)?;

        let estimated_value = fields
            .estimated_value
            .map(|v| require_positive("estimated_value", v))
            .transpose()?;

        if fields.closing_at <= published_at {
            return Err(ValidationError::ClosingNotAfterPublication {
                published_at,
                closing_at: fields.closing_at,
            });
        }

        Ok(Self {
            id: SolicitationId::new(),
            agency_name,
            title,
            naics,
            requirements,
            required_certifications,
            estimated_value,
            published_at,
            closing_at: fields.closing_at,
            status: LifecycleState::Draft,
        })
    }

    /// Return a copy advanced to `status`
    ///
    /// Re-applying the current status is allowed; moving backwards is not.
    pub fn with_status(&self, status: LifecycleState) -> Result<Self, ValidationError> {
        if status < self.status {
            return Err(ValidationError::StatusRegression {
                from: self.status,
                to: status,
            });
        }
        Ok(Self {
            status,
            ..self.clone()
        })
    }

    /// Whether `at` falls inside the bidding window `[published_at, closing_at)`
    pub fn is_open_at(&self, at: Timestamp) -> bool {
        self.published_at <= at && at < self.closing_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn published() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap()
    }

    fn fields() -> SolicitationFields {
        SolicitationFields {
            agency_name: "City of Houston Procurement".to_string(),
            title: "IT Helpdesk Support Services".to_string(),
            naics: "541519".to_string(),
            requirements: vec!["Provide Tier 1-2 helpdesk support".to_string()],
            required_certifications: vec!["ISO-20000".to_string()],
            estimated_value: Some(dec!(110000)),
            closing_at: published() + Duration::days(11),
        }
    }

    #[test]
    fn test_draft_valid() {
        let solicitation = Solicitation::draft(fields(), published()).unwrap();
        assert_eq!(solicitation.status, LifecycleState::Draft);
        assert_eq!(solicitation.naics, "541519");
        assert!(solicitation.closing_at > solicitation.published_at);
    }

    #[test]
    fn test_draft_rejects_closing_before_publication() {
        let mut f = fields();
        f.closing_at = published();

        let result = Solicitation::draft(f, published());
        assert!(matches!(result, Err(ValidationError::ClosingNotAfterPublication { .. })));
    }

    #[test]
    fn test_draft_rejects_blank_title() {
        let mut f = fields();
        f.title = "  ".to_string();
        assert_eq!(
            Solicitation::draft(f, published()),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn test_draft_rejects_non_positive_estimate() {
        let mut f = fields();
        f.estimated_value = Some(dec!(0));
        assert!(matches!(
            Solicitation::draft(f, published()),
            Err(ValidationError::InvalidField { field: "estimated_value", .. })
        ));
    }

    #[test]
    fn test_status_only_moves_forward() {
        let draft = Solicitation::draft(fields(), published()).unwrap();
        let open = draft.with_status(LifecycleState::Open).unwrap();
        assert_eq!(open.status, LifecycleState::Open);
        assert_eq!(draft.status, LifecycleState::Draft, "original value is untouched");

        let err = open.with_status(LifecycleState::Draft).unwrap_err();
        assert_eq!(
            err,
            ValidationError::StatusRegression {
                from: LifecycleState::Open,
                to: LifecycleState::Draft,
            }
        );
    }

    #[test]
    fn test_open_window_is_half_open() {
        let s = Solicitation::draft(fields(), published()).unwrap();
        assert!(s.is_open_at(s.published_at));
        assert!(s.is_open_at(s.closing_at - Duration::seconds(1)));
        assert!(!s.is_open_at(s.closing_at));
        assert!(!s.is_open_at(s.published_at - Duration::seconds(1)));
    }
}
