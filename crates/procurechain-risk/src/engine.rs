//! Rule-based risk evaluation

use crate::rules::{Finding, RuleInput, RULES};
use crate::{selection, RiskPolicy, SelectionError};
use procurechain_domain::{Bid, Money, Solicitation, ValidationError};
use rust_decimal::Decimal;

/// Outcome of scoring one bid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    /// Accumulated score, capped at the policy maximum
    pub score: u8,

    /// Reasons in rule order
    pub reasons: Vec<String>,

    /// False iff any hard-gate rule fired
    pub compliance_pass: bool,

    /// The findings the reasons were taken from
    pub findings: Vec<Finding>,
}

/// Deterministic, explainable bid scorer
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    policy: RiskPolicy,
}

impl RiskEngine {
    /// Create an engine with the given policy
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    /// Create an engine with the default policy
    pub fn default_policy() -> Self {
        Self::new(RiskPolicy::default())
    }

    /// The policy in effect
    pub fn policy(&self) -> &RiskPolicy {
        &self.policy
    }

    /// Score `bid` against `solicitation`
    ///
    /// The pricing baseline is the solicitation's estimated value; without
    /// one the price rule does not fire.
    pub fn evaluate(&self, bid: &Bid, solicitation: &Solicitation) -> RiskAssessment {
        self.evaluate_against(bid, solicitation, solicitation.estimated_value)
    }

    /// Score `bid` with an explicit pricing baseline
    pub fn evaluate_against(
        &self,
        bid: &Bid,
        solicitation: &Solicitation,
        baseline: Option<Money>,
    ) -> RiskAssessment {
        let input = RuleInput {
            bid,
            solicitation,
            baseline,
        };

        let findings: Vec<Finding> = RULES
            .iter()
            .filter_map(|rule| (rule.check)(&input, &self.policy))
            .collect();

        let cap = u32::from(self.policy.max_score.min(100));
        let total = findings
            .iter()
            .fold(0u32, |acc, f| acc.saturating_add(f.weight))
            .min(cap);
        // total <= 100 after the cap
        let score = u8::try_from(total).unwrap_or(u8::MAX);

        let compliance_pass = !findings.iter().any(|f| f.hard_gate);
        let reasons = findings.iter().map(|f| f.reason.clone()).collect();

        tracing::debug!(
            bid_id = %bid.id,
            vendor_id = %bid.vendor_id,
            score,
            compliance_pass,
            findings = findings.len(),
            "Bid scored"
        );

        RiskAssessment {
            score,
            reasons,
            compliance_pass,
            findings,
        }
    }

    /// Score every bid, returning evaluated copies in input order
    ///
    /// Without an estimated value the median of the bid prices serves as the
    /// pricing baseline.
    pub fn evaluate_all(
        &self,
        bids: &[Bid],
        solicitation: &Solicitation,
    ) -> Result<Vec<Bid>, ValidationError> {
        let baseline = solicitation.estimated_value.or_else(|| median_price(bids));

        bids.iter()
            .map(|bid| {
                let assessment = self.evaluate_against(bid, solicitation, baseline);
                bid.with_evaluation(
                    assessment.score,
                    assessment.reasons,
                    assessment.compliance_pass,
                )
            })
            .collect()
    }

    /// Select the award candidate under this engine's policy
    pub fn select_winner<'a>(&self, bids: &'a [Bid]) -> Result<&'a Bid, SelectionError> {
        selection::select_winner(bids, &self.policy)
    }
}

/// Median bid price, or `None` for no bids
///
/// With an even count the two middle prices are averaged. Prices are
/// positive, so the midpoint form stays within range at the decimal limit.
pub fn median_price(bids: &[Bid]) -> Option<Decimal> {
    let mut prices: Vec<Decimal> = bids.iter().map(|b| b.price).collect();
    if prices.is_empty() {
        return None;
    }
    prices.sort_unstable();

    let mid = prices.len() / 2;
    if prices.len() % 2 == 1 {
        Some(prices[mid])
    } else {
        let (low, high) = (prices[mid - 1], prices[mid]);
        Some(low + (high - low) / Decimal::TWO)
    }
}
