//! Bid module - a vendor's offer against an open solicitation

use crate::validation::{optional_digest, require_entries, require_positive};
use crate::{BidId, Money, Solicitation, SolicitationId, Timestamp, ValidationError, VendorId};
use serde::{Deserialize, Serialize};

/// Compliance attributes a vendor declares with its bid
///
/// Only flags, codes and scores are carried; supporting documents stay
/// off-ledger and are referenced by digest on the bid itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAttributes {
    /// Vendor holds an active SAM registration
    pub sam_registered: bool,

    /// Vendor's insurance certificate is current
    pub insurance_valid: bool,

    /// Bid meets the technical requirements
    pub technical_compliance: bool,

    /// All required bid documents were provided
    pub documents_complete: bool,

    /// Certifications the vendor holds
    pub certifications: Vec<String>,

    /// NAICS codes the vendor is registered under
    pub naics_codes: Vec<String>,

    /// Past performance rating (0-100), if the vendor has a record
    pub past_performance_score: Option<u8>,
}

impl ComplianceAttributes {
    /// Whether the vendor holds `certification` (case-insensitive)
    pub fn holds_certification(&self, certification: &str) -> bool {
        self.certifications
            .iter()
            .any(|held| held.eq_ignore_ascii_case(certification))
    }

    /// Whether the vendor is registered under `naics`
    pub fn covers_naics(&self, naics: &str) -> bool {
        self.naics_codes.iter().any(|code| code == naics)
    }
}

/// Caller-supplied fields for a new bid
#[derive(Debug, Clone, PartialEq)]
pub struct BidFields {
    /// Submitting vendor's registry code
    pub vendor_id: String,

    /// Total offered price
    pub price: Money,

    /// Promised delivery time in days
    pub delivery_days: u32,

    /// Declared compliance attributes
    pub compliance: ComplianceAttributes,

    /// SHA-256 digest of the proposal document
    pub document_hash: Option<String>,
}

/// A vendor's submitted offer
///
/// The evaluation fields stay empty until the risk engine scores the bid;
/// scoring produces a new value through [`Bid::with_evaluation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Unique identifier
    pub id: BidId,

    /// Solicitation this bid answers
    pub solicitation_id: SolicitationId,

    /// Submitting vendor
    pub vendor_id: VendorId,

    /// Total offered price
    pub price: Money,

    /// Promised delivery time in days
    pub delivery_days: u32,

    /// When the bid was received
    pub submitted_at: Timestamp,

    /// Declared compliance attributes
    pub compliance: ComplianceAttributes,

    /// SHA-256 digest of the proposal document
    pub document_hash: Option<String>,

    /// Risk score (0-100), set by evaluation
    pub risk_score: Option<u8>,

    /// Ordered explanation of the risk score
    pub risk_reasons: Vec<String>,

    /// Whether every hard compliance gate passed, set by evaluation
    pub compliance_pass: Option<bool>,
}

impl Bid {
    /// Create a bid against `solicitation`
    ///
    /// The submission time must fall inside the solicitation's open window.
    pub fn submit(
        solicitation: &Solicitation,
        fields: BidFields,
        submitted_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let vendor_id = VendorId::new(fields.vendor_id)?;
        let price = require_positive("price", fields.price)?;

        if fields.delivery_days == 0 {
            return Err(ValidationError::InvalidField {
                field: "delivery_days",
                reason: "must be at least one day".to_string(),
            });
        }

        if let Some(score) = fields.compliance.past_performance_score {
            if score > 100 {
                return Err(ValidationError::InvalidField {
                    field: "past_performance_score",
                    reason: format!("{} is outside [0, 100]", score),
                });
            }
        }

        let compliance = ComplianceAttributes {
            certifications: require_entries("certifications", &fields.compliance.certifications)?,
            naics_codes: require_entries("naics_codes", &fields.compliance.naics_codes)?,
            ..fields.compliance
        };
        let document_hash = optional_digest("document_hash", fields.document_hash.as_deref())?;

        if !solicitation.is_open_at(submitted_at) {
            return Err(ValidationError::OutsideBiddingWindow {
                submitted_at,
                opens_at: solicitation.published_at,
                closes_at: solicitation.closing_at,
            });
        }

        Ok(Self {
            id: BidId::new(),
            solicitation_id: solicitation.id,
            vendor_id,
            price,
            delivery_days: fields.delivery_days,
            submitted_at,
            compliance,
            document_hash,
            risk_score: None,
            risk_reasons: Vec::new(),
            compliance_pass: None,
        })
    }

    /// Whether the risk engine has scored this bid
    pub fn is_evaluated(&self) -> bool {
        self.risk_score.is_some() && self.compliance_pass.is_some()
    }

    /// Return a copy carrying a risk evaluation
    pub fn with_evaluation(
        &self,
        score: u8,
        reasons: Vec<String>,
        compliance_pass: bool,
    ) -> Result<Self, ValidationError> {
        if score > 100 {
            return Err(ValidationError::InvalidField {
                field: "risk_score",
                reason: format!("{} is outside [0, 100]", score),
            });
        }
        Ok(Self {
            risk_score: Some(score),
            risk_reasons: reasons,
            compliance_pass: Some(compliance_pass),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SolicitationFields;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn solicitation() -> Solicitation {
        let published = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        Solicitation::draft(
            SolicitationFields {
                agency_name: "City of Houston Procurement".to_string(),
                title: "IT Helpdesk Support Services".to_string(),
                naics: "541519".to_string(),
                requirements: vec![],
                required_certifications: vec![],
                estimated_value: None,
                closing_at: published + Duration::days(10),
            },
            published,
        )
        .unwrap()
    }

    fn fields() -> BidFields {
        BidFields {
            vendor_id: "VENDOR_ACME".to_string(),
            price: dec!(120000.00),
            delivery_days: 14,
            compliance: ComplianceAttributes {
                sam_registered: true,
                insurance_valid: true,
                technical_compliance: true,
                documents_complete: true,
                certifications: vec!["ISO-20000".to_string()],
                naics_codes: vec!["541519".to_string()],
                past_performance_score: Some(82),
            },
            document_hash: None,
        }
    }

    #[test]
    fn test_submit_within_window() {
        let s = solicitation();
        let bid = Bid::submit(&s, fields(), s.published_at + Duration::days(2)).unwrap();

        assert_eq!(bid.solicitation_id, s.id);
        assert_eq!(bid.vendor_id.as_str(), "VENDOR_ACME");
        assert!(!bid.is_evaluated());
        assert!(bid.risk_reasons.is_empty());
    }

    #[test]
    fn test_submit_outside_window() {
        let s = solicitation();

        let late = Bid::submit(&s, fields(), s.closing_at);
        assert!(matches!(late, Err(ValidationError::OutsideBiddingWindow { .. })));

        let early = Bid::submit(&s, fields(), s.published_at - Duration::minutes(1));
        assert!(matches!(early, Err(ValidationError::OutsideBiddingWindow { .. })));
    }

    #[test]
    fn test_submit_rejects_bad_fields() {
        let s = solicitation();
        let at = s.published_at + Duration::hours(1);

        let mut f = fields();
        f.price = dec!(0);
        assert!(matches!(
            Bid::submit(&s, f, at),
            Err(ValidationError::InvalidField { field: "price", .. })
        ));

        let mut f = fields();
        f.delivery_days = 0;
        assert!(matches!(
            Bid::submit(&s, f, at),
            Err(ValidationError::InvalidField { field: "delivery_days", .. })
        ));

        let mut f = fields();
        f.compliance.past_performance_score = Some(101);
        assert!(Bid::submit(&s, f, at).is_err());

        let mut f = fields();
        f.vendor_id = String::new();
        assert_eq!(Bid::submit(&s, f, at), Err(ValidationError::MissingField("vendor_id")));
    }

    #[test]
    fn test_with_evaluation_is_a_new_value() {
        let s = solicitation();
        let bid = Bid::submit(&s, fields(), s.published_at + Duration::hours(3)).unwrap();
        let evaluated = bid
            .with_evaluation(25, vec!["Missing certification: ISO-27001".to_string()], false)
            .unwrap();

        assert!(evaluated.is_evaluated());
        assert_eq!(evaluated.risk_score, Some(25));
        assert_eq!(evaluated.compliance_pass, Some(false));
        assert_eq!(evaluated.id, bid.id);
        assert!(!bid.is_evaluated());

        assert!(bid.with_evaluation(101, vec![], true).is_err());
    }

    #[test]
    fn test_certification_lookup_is_case_insensitive() {
        let attrs = fields().compliance;
        assert!(attrs.holds_certification("iso-20000"));
        assert!(!attrs.holds_certification("ISO-27001"));
        assert!(attrs.covers_naics("541519"));
        assert!(!attrs.covers_naics("541511"));
    }
}
