//! The interaction state enum and its legal-transition table.

use serde::{Deserialize, Serialize};

/// What a participant is currently allowed to do, from the scheduler's
/// point of view.
///
/// The transition table is closed — every legal edge is listed here and
/// nothing else ever mutates a participant's state:
///
/// ```text
/// Roaming     → Interacting | Waiting | Summoned
/// Interacting → Waiting | Roaming
/// Waiting     → Roaming | Interacting
/// Summoned    → Roaming | Waiting
/// ```
///
/// - **Roaming**: free on the map, not in a submission window. The default
///   for any participant the machine has never seen.
/// - **Interacting**: mid-task or mid-minigame.
/// - **Waiting**: prompted this tick; the only window in which submitting
///   an action is legal (besides Interacting).
/// - **Summoned**: pulled into a forced group event (meeting). Neither
///   Interacting nor Waiting can reach Summoned directly — a participant
///   mid-task or mid-submission must resolve first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionState {
    #[default]
    Roaming,
    Interacting,
    Waiting,
    Summoned,
}

impl InteractionState {
    /// All four states, for enumerating the transition matrix.
    pub const ALL: [Self; 4] = [Self::Roaming, Self::Interacting, Self::Waiting, Self::Summoned];
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roaming => write!(f, "Roaming"),
            Self::Interacting => write!(f, "Interacting"),
            Self::Waiting => write!(f, "Waiting"),
            Self::Summoned => write!(f, "Summoned"),
        }
    }
}

/// The states legally reachable from `from`. This IS the table — both
/// `can_transition` and the error messages are derived from it.
pub fn allowed_from(from: InteractionState) -> &'static [InteractionState] {
    use InteractionState::*;
    match from {
        Roaming => &[Interacting, Waiting, Summoned],
        Interacting => &[Waiting, Roaming],
        Waiting => &[Roaming, Interacting],
        Summoned => &[Roaming, Waiting],
    }
}

/// `true` if the table permits `from → to`.
///
/// Pure lookup, no mutation — callers use this to pre-validate before
/// attempting a real transition. Note self-transitions are never legal.
pub fn can_transition(from: InteractionState, to: InteractionState) -> bool {
    allowed_from(from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use InteractionState::*;

    #[test]
    fn test_default_state_is_roaming() {
        assert_eq!(InteractionState::default(), Roaming);
    }

    #[test]
    fn test_full_transition_matrix_matches_table() {
        // Enumerate all 16 pairs. Exactly these nine edges are legal.
        let legal = [
            (Roaming, Interacting),
            (Roaming, Waiting),
            (Roaming, Summoned),
            (Interacting, Waiting),
            (Interacting, Roaming),
            (Waiting, Roaming),
            (Waiting, Interacting),
            (Summoned, Roaming),
            (Summoned, Waiting),
        ];

        for from in InteractionState::ALL {
            for to in InteractionState::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    can_transition(from, to),
                    expected,
                    "table disagrees on {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_summoned_unreachable_from_interacting_and_waiting() {
        // The fairness invariant: mid-task / mid-submission participants
        // must resolve before being pulled into a meeting.
        assert!(!can_transition(Interacting, Summoned));
        assert!(!can_transition(Waiting, Summoned));
    }

    #[test]
    fn test_self_transitions_are_rejected() {
        for state in InteractionState::ALL {
            assert!(!can_transition(state, state), "{state} -> {state} must be illegal");
        }
    }

    #[test]
    fn test_allowed_from_roaming_lists_three_targets() {
        assert_eq!(allowed_from(Roaming), &[Interacting, Waiting, Summoned]);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(Roaming.to_string(), "Roaming");
        assert_eq!(Summoned.to_string(), "Summoned");
    }
}
