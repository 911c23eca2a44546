//! Lifecycle states and events for a solicitation

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a solicitation in the procurement lifecycle
///
/// States only ever advance in declaration order:
/// - Draft: Created, not yet visible to vendors
/// - Open: Published and accepting bids
/// - Closed: Bidding closed, bids frozen
/// - Evaluated: Every bid carries a risk score
/// - Awarded: Exactly one award recorded
/// - Completed: Deliverables accepted
/// - ClosedOut: Terminal, no further mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Created but not yet published
    Draft,

    /// Published and accepting bids
    Open,

    /// Bidding closed
    Closed,

    /// All bids scored by the risk engine
    Evaluated,

    /// Contract awarded
    Awarded,

    /// Performance complete
    Completed,

    /// Closed out (terminal)
    ClosedOut,
}

impl LifecycleState {
    /// Get the state name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Draft => "draft",
            LifecycleState::Open => "open",
            LifecycleState::Closed => "closed",
            LifecycleState::Evaluated => "evaluated",
            LifecycleState::Awarded => "awarded",
            LifecycleState::Completed => "completed",
            LifecycleState::ClosedOut => "closed_out",
        }
    }

    /// Parse a state from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(LifecycleState::Draft),
            "open" => Some(LifecycleState::Open),
            "closed" => Some(LifecycleState::Closed),
            "evaluated" => Some(LifecycleState::Evaluated),
            "awarded" => Some(LifecycleState::Awarded),
            "completed" => Some(LifecycleState::Completed),
            "closed_out" | "closedout" => Some(LifecycleState::ClosedOut),
            _ => None,
        }
    }

    /// Get the next state in the lifecycle
    pub fn next(&self) -> Option<Self> {
        match self {
            LifecycleState::Draft => Some(LifecycleState::Open),
            LifecycleState::Open => Some(LifecycleState::Closed),
            LifecycleState::Closed => Some(LifecycleState::Evaluated),
            LifecycleState::Evaluated => Some(LifecycleState::Awarded),
            LifecycleState::Awarded => Some(LifecycleState::Completed),
            LifecycleState::Completed => Some(LifecycleState::ClosedOut),
            LifecycleState::ClosedOut => None,
        }
    }

    /// Whether no further events are accepted
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::ClosedOut)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid lifecycle state: {}", s))
    }
}

/// Event applied to a solicitation's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEvent {
    /// Publish a drafted solicitation
    Publish,
    /// Record a vendor bid
    SubmitBid,
    /// Close the bidding window
    CloseBidding,
    /// Score every submitted bid
    EvaluateBids,
    /// Select the winner and record the award
    AwardContract,
    /// Record a deliverable against the award
    SubmitDeliverable,
    /// Accept a submitted deliverable
    AcceptDeliverable,
    /// Mark performance complete once nothing is pending
    CompletePerformance,
    /// Close out the contract
    CloseOut,
}

impl LifecycleEvent {
    /// Every event, in lifecycle order
    pub const ALL: [LifecycleEvent; 9] = [
        LifecycleEvent::Publish,
        LifecycleEvent::SubmitBid,
        LifecycleEvent::CloseBidding,
        LifecycleEvent::EvaluateBids,
        LifecycleEvent::AwardContract,
        LifecycleEvent::SubmitDeliverable,
        LifecycleEvent::AcceptDeliverable,
        LifecycleEvent::CompletePerformance,
        LifecycleEvent::CloseOut,
    ];

    /// Get the event name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Publish => "publish",
            LifecycleEvent::SubmitBid => "submit_bid",
            LifecycleEvent::CloseBidding => "close_bidding",
            LifecycleEvent::EvaluateBids => "evaluate_bids",
            LifecycleEvent::AwardContract => "award_contract",
            LifecycleEvent::SubmitDeliverable => "submit_deliverable",
            LifecycleEvent::AcceptDeliverable => "accept_deliverable",
            LifecycleEvent::CompletePerformance => "complete_performance",
            LifecycleEvent::CloseOut => "close_out",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_progression() {
        let mut state = LifecycleState::Draft;
        let mut visited = vec![state];
        while let Some(next) = state.next() {
            assert!(next > state, "{} must advance past {}", next, state);
            state = next;
            visited.push(state);
        }

        assert_eq!(visited.len(), 7);
        assert_eq!(state, LifecycleState::ClosedOut);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_state_parse_roundtrip() {
        let mut state = Some(LifecycleState::Draft);
        while let Some(s) = state {
            assert_eq!(LifecycleState::parse(s.as_str()), Some(s));
            state = s.next();
        }
        assert_eq!("OPEN".parse::<LifecycleState>(), Ok(LifecycleState::Open));
        assert!("reopened".parse::<LifecycleState>().is_err());
    }

    #[test]
    fn test_state_serializes_screaming_case() {
        let json = serde_json::to_string(&LifecycleState::ClosedOut).unwrap();
        assert_eq!(json, "\"CLOSED_OUT\"");
    }
}
