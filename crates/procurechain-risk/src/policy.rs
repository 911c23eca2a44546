//! Risk policy configuration
//!
//! Rule weights and thresholds are policy choices, not structure. Each has a
//! named default constant and can be overridden through configuration.

use crate::PolicyError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound of the risk score scale
pub const MAX_SCORE: u8 = 100;

/// Scores strictly above this value disqualify a bid from award
pub const DISQUALIFICATION_THRESHOLD: u8 = 50;

/// Weight when a bid references a different solicitation
pub const SOLICITATION_MISMATCH_WEIGHT: u32 = 60;

/// Weight when a required certification is missing
pub const MISSING_CERTIFICATION_WEIGHT: u32 = 25;

/// Weight when the vendor is not SAM-registered
pub const SAM_UNREGISTERED_WEIGHT: u32 = 50;

/// Weight when the vendor's insurance is not valid
pub const INSURANCE_INVALID_WEIGHT: u32 = 40;

/// Weight when the bid is technically non-compliant
pub const TECHNICAL_NONCOMPLIANCE_WEIGHT: u32 = 50;

/// Weight when bid documents are incomplete
pub const INCOMPLETE_DOCUMENTS_WEIGHT: u32 = 15;

/// Weight when vendor NAICS codes exclude the solicitation's
pub const NAICS_MISMATCH_WEIGHT: u32 = 20;

/// Past performance scores below this are low
pub const LOW_PAST_PERFORMANCE_BELOW: u8 = 60;

/// Weight for a low past performance score
pub const LOW_PAST_PERFORMANCE_WEIGHT: u32 = 25;

/// Past performance scores below this (and not low) are moderate
pub const MODERATE_PAST_PERFORMANCE_BELOW: u8 = 75;

/// Weight for a moderate past performance score
pub const MODERATE_PAST_PERFORMANCE_WEIGHT: u32 = 10;

/// Delivery at or under this many days is aggressive
pub const AGGRESSIVE_DELIVERY_DAYS: u32 = 3;

/// Weight for an aggressive delivery timeline
pub const AGGRESSIVE_DELIVERY_WEIGHT: u32 = 15;

/// Delivery over this many days is long
pub const LONG_DELIVERY_DAYS: u32 = 60;

/// Weight for a long delivery timeline
pub const LONG_DELIVERY_WEIGHT: u32 = 10;

/// Weight when price falls more than the low-ball discount below baseline
pub const LOW_BALL_WEIGHT: u32 = 20;

/// Weight when price exceeds baseline by more than the premium
pub const HIGH_PRICE_WEIGHT: u32 = 10;

/// Length of the late-submission window before closing (minutes)
pub const LATE_SUBMISSION_WINDOW_MINUTES: i64 = 60;

/// Weight for a submission inside the late window
pub const LATE_SUBMISSION_WEIGHT: u32 = 5;

/// Longest late-submission window accepted by validation (one week)
const MAX_LATE_WINDOW_MINUTES: i64 = 7 * 24 * 60;

/// Default low-ball discount: 40% below baseline
fn default_low_ball_discount() -> Decimal {
    Decimal::new(40, 2)
}

/// Default high-price premium: 50% above baseline
fn default_high_price_premium() -> Decimal {
    Decimal::new(50, 2)
}

/// Weights and thresholds for the risk rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Cap applied to the accumulated score
    pub max_score: u8,

    /// Scores strictly above this are disqualified from award
    pub disqualification_threshold: u8,

    /// Bid references another solicitation (hard gate)
    pub solicitation_mismatch_weight: u32,

    /// Required certification missing (hard gate)
    pub missing_certification_weight: u32,

    /// Vendor not SAM-registered (hard gate)
    pub sam_unregistered_weight: u32,

    /// Vendor insurance invalid (hard gate)
    pub insurance_invalid_weight: u32,

    /// Bid technically non-compliant (hard gate)
    pub technical_noncompliance_weight: u32,

    /// Bid documents incomplete (hard gate)
    pub incomplete_documents_weight: u32,

    /// Vendor NAICS codes exclude the solicitation NAICS
    pub naics_mismatch_weight: u32,

    /// Past performance below this is low
    pub low_past_performance_below: u8,

    /// Weight for low past performance
    pub low_past_performance_weight: u32,

    /// Past performance below this is moderate
    pub moderate_past_performance_below: u8,

    /// Weight for moderate past performance
    pub moderate_past_performance_weight: u32,

    /// Delivery at or under this is aggressive
    pub aggressive_delivery_days: u32,

    /// Weight for aggressive delivery
    pub aggressive_delivery_weight: u32,

    /// Delivery over this is long
    pub long_delivery_days: u32,

    /// Weight for long delivery
    pub long_delivery_weight: u32,

    /// Fraction below baseline that counts as low-ball (0.40 = 40%)
    pub low_ball_discount: Decimal,

    /// Weight for low-ball pricing
    pub low_ball_weight: u32,

    /// Fraction above baseline that counts as high (0.50 = 50%)
    pub high_price_premium: Decimal,

    /// Weight for high pricing
    pub high_price_weight: u32,

    /// Minutes before closing that count as a late submission
    pub late_submission_window_minutes: i64,

    /// Weight for late submission
    pub late_submission_weight: u32,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            max_score: MAX_SCORE,
            disqualification_threshold: DISQUALIFICATION_THRESHOLD,
            solicitation_mismatch_weight: SOLICITATION_MISMATCH_WEIGHT,
            missing_certification_weight: MISSING_CERTIFICATION_WEIGHT,
            sam_unregistered_weight: SAM_UNREGISTERED_WEIGHT,
            insurance_invalid_weight: INSURANCE_INVALID_WEIGHT,
            technical_noncompliance_weight: TECHNICAL_NONCOMPLIANCE_WEIGHT,
            incomplete_documents_weight: INCOMPLETE_DOCUMENTS_WEIGHT,
            naics_mismatch_weight: NAICS_MISMATCH_WEIGHT,
            low_past_performance_below: LOW_PAST_PERFORMANCE_BELOW,
            low_past_performance_weight: LOW_PAST_PERFORMANCE_WEIGHT,
            moderate_past_performance_below: MODERATE_PAST_PERFORMANCE_BELOW,
            moderate_past_performance_weight: MODERATE_PAST_PERFORMANCE_WEIGHT,
            aggressive_delivery_days: AGGRESSIVE_DELIVERY_DAYS,
            aggressive_delivery_weight: AGGRESSIVE_DELIVERY_WEIGHT,
            long_delivery_days: LONG_DELIVERY_DAYS,
            long_delivery_weight: LONG_DELIVERY_WEIGHT,
            low_ball_discount: default_low_ball_discount(),
            low_ball_weight: LOW_BALL_WEIGHT,
            high_price_premium: default_high_price_premium(),
            high_price_weight: HIGH_PRICE_WEIGHT,
            late_submission_window_minutes: LATE_SUBMISSION_WINDOW_MINUTES,
            late_submission_weight: LATE_SUBMISSION_WEIGHT,
        }
    }
}

impl RiskPolicy {
    /// Strict policy: lower tolerance for risk before disqualification
    ///
    /// - Disqualify above 30
    /// - Low-ball at 30% below baseline
    /// - Two-hour late-submission window
    pub fn strict() -> Self {
        Self {
            disqualification_threshold: 30,
            low_ball_discount: Decimal::new(30, 2),
            late_submission_window_minutes: 120,
            naics_mismatch_weight: 30,
            ..Self::default()
        }
    }

    /// Lenient policy: tolerate more soft risk before disqualification
    ///
    /// - Disqualify above 70
    /// - Low-ball at 50% below baseline
    pub fn lenient() -> Self {
        Self {
            disqualification_threshold: 70,
            low_ball_discount: Decimal::new(50, 2),
            late_submission_window_minutes: 30,
            ..Self::default()
        }
    }

    /// Check that the policy values are consistent
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_score == 0 || self.max_score > MAX_SCORE {
            return Err(PolicyError::Invalid(format!(
                "max_score must be in 1..={}, got {}",
                MAX_SCORE, self.max_score
            )));
        }
        if self.disqualification_threshold > self.max_score {
            return Err(PolicyError::Invalid(format!(
                "disqualification_threshold {} exceeds max_score {}",
                self.disqualification_threshold, self.max_score
            )));
        }
        if self.low_past_performance_below > self.moderate_past_performance_below
            || self.moderate_past_performance_below > 100
        {
            return Err(PolicyError::Invalid(
                "past performance thresholds must satisfy low <= moderate <= 100".to_string(),
            ));
        }
        if self.aggressive_delivery_days >= self.long_delivery_days {
            return Err(PolicyError::Invalid(format!(
                "aggressive_delivery_days {} must be below long_delivery_days {}",
                self.aggressive_delivery_days, self.long_delivery_days
            )));
        }
        if self.low_ball_discount <= Decimal::ZERO || self.low_ball_discount >= Decimal::ONE {
            return Err(PolicyError::Invalid(format!(
                "low_ball_discount must be in (0, 1), got {}",
                self.low_ball_discount
            )));
        }
        if self.high_price_premium <= Decimal::ZERO {
            return Err(PolicyError::Invalid(format!(
                "high_price_premium must be positive, got {}",
                self.high_price_premium
            )));
        }
        if !(0..=MAX_LATE_WINDOW_MINUTES).contains(&self.late_submission_window_minutes) {
            return Err(PolicyError::Invalid(format!(
                "late_submission_window_minutes must be in 0..={}, got {}",
                MAX_LATE_WINDOW_MINUTES, self.late_submission_window_minutes
            )));
        }
        Ok(())
    }
}
