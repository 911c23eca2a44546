//! Lifecycle transition table

use crate::InvalidTransition;
use procurechain_domain::{LifecycleEvent, LifecycleState};

/// Apply `event` to `state`
///
/// Every permitted pair is listed here; anything else is an
/// [`InvalidTransition`].
pub fn transition(state: LifecycleState, event: LifecycleEvent) -> Result<LifecycleState, InvalidTransition> {
    use LifecycleEvent as E;
    use LifecycleState as S;

    match (state, event) {
        (S::Draft, E::Publish) => Ok(S::Open),
        (S::Open, E::SubmitBid) => Ok(S::Open),
        (S::Open, E::CloseBidding) => Ok(S::Closed),
        (S::Closed, E::EvaluateBids) => Ok(S::Evaluated),
        (S::Evaluated, E::AwardContract) => Ok(S::Awarded),
        (S::Awarded, E::SubmitDeliverable) => Ok(S::Awarded),
        (S::Awarded, E::AcceptDeliverable) => Ok(S::Awarded),
        (S::Awarded, E::CompletePerformance) => Ok(S::Completed),
        (S::Completed, E::CloseOut) => Ok(S::ClosedOut),
        (state, event) => Err(InvalidTransition { state, event }),
    }
}

/// Whether `event` is accepted in `state`
pub fn permits(state: LifecycleState, event: LifecycleEvent) -> bool {
    transition(state, event).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: [LifecycleState; 7] = [
        LifecycleState::Draft,
        LifecycleState::Open,
        LifecycleState::Closed,
        LifecycleState::Evaluated,
        LifecycleState::Awarded,
        LifecycleState::Completed,
        LifecycleState::ClosedOut,
    ];

    #[test]
    fn test_happy_path() {
        let events = [
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

        let end = events
            .iter()
            .try_fold(LifecycleState::Draft, |state, event| transition(state, *event))
            .unwrap();
        assert_eq!(end, LifecycleState::ClosedOut);
    }

    #[test]
    fn test_exactly_nine_pairs_permitted() {
        let permitted = STATES
            .iter()
            .flat_map(|s| LifecycleEvent::ALL.iter().map(move |e| (*s, *e)))
            .filter(|(s, e)| permits(*s, *e))
            .count();
        assert_eq!(permitted, 9);
    }

    #[test]
    fn test_transitions_never_regress() {
        for state in STATES {
            for event in LifecycleEvent::ALL {
                if let Ok(next) = transition(state, event) {
                    assert!(next >= state, "{} --{}--> {}", state, event, next);
                }
            }
        }
    }

    #[test]
    fn test_closed_out_is_terminal() {
        for event in LifecycleEvent::ALL {
            assert_eq!(
                transition(LifecycleState::ClosedOut, event),
                Err(InvalidTransition {
                    state: LifecycleState::ClosedOut,
                    event,
                })
            );
        }
    }

    #[test]
    fn test_out_of_order_events() {
        assert!(!permits(LifecycleState::Closed, LifecycleEvent::AwardContract));
        assert!(!permits(LifecycleState::Closed, LifecycleEvent::SubmitBid));
        assert!(!permits(LifecycleState::Evaluated, LifecycleEvent::AcceptDeliverable));
        assert!(!permits(LifecycleState::Awarded, LifecycleEvent::CloseOut));
    }
}
