//! Risk rules
//!
//! Each rule is a pure check over a bid and its solicitation. Rules run in
//! the order of [`RULES`]; that order is also the order of the reasons on an
//! evaluated bid.

use crate::RiskPolicy;
use procurechain_domain::{Bid, Money, Solicitation};
use rust_decimal::Decimal;

/// Everything a rule may inspect
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// The bid being scored
    pub bid: &'a Bid,

    /// The solicitation it was scored against
    pub solicitation: &'a Solicitation,

    /// Pricing baseline (estimate or peer median), if any
    pub baseline: Option<Money>,
}

/// A single rule outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Name of the rule that fired
    pub rule: &'static str,

    /// Points added to the score
    pub weight: u32,

    /// Human-readable explanation
    pub reason: String,

    /// Whether this finding fails compliance
    pub hard_gate: bool,
}

impl Finding {
    /// A finding that fails compliance
    pub fn hard(rule: &'static str, weight: u32, reason: impl Into<String>) -> Self {
        Self {
            rule,
            weight,
            reason: reason.into(),
            hard_gate: true,
        }
    }

    /// A finding that only adds risk
    pub fn soft(rule: &'static str, weight: u32, reason: impl Into<String>) -> Self {
        Self {
            rule,
            weight,
            reason: reason.into(),
            hard_gate: false,
        }
    }
}

/// A named, pure risk check
#[derive(Clone, Copy)]
pub struct Rule {
    /// Stable rule name
    pub name: &'static str,

    /// The check; `None` when the rule does not fire
    pub check: fn(&RuleInput<'_>, &RiskPolicy) -> Option<Finding>,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// All rules, in evaluation order
pub const RULES: &[Rule] = &[
    Rule {
        name: "solicitation_mismatch",
        check: solicitation_mismatch,
    },
    Rule {
        name: "missing_certification",
        check: missing_certification,
    },
    Rule {
        name: "sam_registration",
        check: sam_registration,
    },
    Rule {
        name: "insurance",
        check: insurance,
    },
    Rule {
        name: "technical_compliance",
        check: technical_compliance,
    },
    Rule {
        name: "documents_complete",
        check: documents_complete,
    },
    Rule {
        name: "naics_match",
        check: naics_match,
    },
    Rule {
        name: "past_performance",
        check: past_performance,
    },
    Rule {
        name: "delivery_timeline",
        check: delivery_timeline,
    },
    Rule {
        name: "price_baseline",
        check: price_baseline,
    },
    Rule {
        name: "late_submission",
        check: late_submission,
    },
];

fn solicitation_mismatch(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    (input.bid.solicitation_id != input.solicitation.id).then(|| {
        Finding::hard(
            "solicitation_mismatch",
            policy.solicitation_mismatch_weight,
            "Bid does not reference this solicitation",
        )
    })
}

fn missing_certification(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    let missing: Vec<&str> = input
        .solicitation
        .required_certifications
        .iter()
        .filter(|required| !input.bid.compliance.holds_certification(required))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        return None;
    }

    Some(Finding::hard(
        "missing_certification",
        policy.missing_certification_weight,
        format!("Missing certification: {}", missing.join(", ")),
    ))
}

fn sam_registration(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    (!input.bid.compliance.sam_registered).then(|| {
        Finding::hard(
            "sam_registration",
            policy.sam_unregistered_weight,
            "Vendor not SAM-registered",
        )
    })
}

fn insurance(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    (!input.bid.compliance.insurance_valid).then(|| {
        Finding::hard(
            "insurance",
            policy.insurance_invalid_weight,
            "Vendor insurance not valid",
        )
    })
}

fn technical_compliance(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    (!input.bid.compliance.technical_compliance).then(|| {
        Finding::hard(
            "technical_compliance",
            policy.technical_noncompliance_weight,
            "Bid technically non-compliant",
        )
    })
}

fn documents_complete(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    (!input.bid.compliance.documents_complete).then(|| {
        Finding::hard(
            "documents_complete",
            policy.incomplete_documents_weight,
            "Incomplete bid documents",
        )
    })
}

fn naics_match(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    (!input.bid.compliance.covers_naics(&input.solicitation.naics)).then(|| {
        Finding::soft(
            "naics_match",
            policy.naics_mismatch_weight,
            "Vendor NAICS codes exclude solicitation NAICS",
        )
    })
}

fn past_performance(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    let score = input.bid.compliance.past_performance_score?;

    if score < policy.low_past_performance_below {
        Some(Finding::soft(
            "past_performance",
            policy.low_past_performance_weight,
            "Low past performance score",
        ))
    } else if score < policy.moderate_past_performance_below {
        Some(Finding::soft(
            "past_performance",
            policy.moderate_past_performance_weight,
            "Moderate past performance score",
        ))
    } else {
        None
    }
}

fn delivery_timeline(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    let days = input.bid.delivery_days;

    if days <= policy.aggressive_delivery_days {
        Some(Finding::soft(
            "delivery_timeline",
            policy.aggressive_delivery_weight,
            "Aggressive delivery timeline",
        ))
    } else if days > policy.long_delivery_days {
        Some(Finding::soft(
            "delivery_timeline",
            policy.long_delivery_weight,
            "Long delivery timeline",
        ))
    } else {
        None
    }
}

fn price_baseline(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    let baseline = input.baseline.filter(|b| *b > Decimal::ZERO)?;
    let price = input.bid.price;

    // A bound that overflows lies outside the representable range and cannot be crossed
    let floor = Decimal::ONE
        .checked_sub(policy.low_ball_discount)
        .and_then(|factor| baseline.checked_mul(factor));
    let ceiling = Decimal::ONE
        .checked_add(policy.high_price_premium)
        .and_then(|factor| baseline.checked_mul(factor));

    if floor.is_some_and(|floor| price < floor) {
        Some(Finding::soft(
            "price_baseline",
            policy.low_ball_weight,
            "Possible low-ball pricing",
        ))
    } else if ceiling.is_some_and(|ceiling| price > ceiling) {
        Some(Finding::soft(
            "price_baseline",
            policy.high_price_weight,
            "Price well above baseline",
        ))
    } else {
        None
    }
}

fn late_submission(input: &RuleInput<'_>, policy: &RiskPolicy) -> Option<Finding> {
    let window = chrono::Duration::try_minutes(policy.late_submission_window_minutes)?;
    let closing_at = input.solicitation.closing_at;
    let submitted_at = input.bid.submitted_at;
    let window_opens = closing_at.checked_sub_signed(window)?;

    (submitted_at < closing_at && submitted_at >= window_opens).then(|| {
        Finding::soft(
            "late_submission",
            policy.late_submission_weight,
            "Late submission risk",
        )
    })
}
