//! The participant state machine: a registry of interaction states.
//!
//! # Concurrency note
//!
//! `StateMachine` is NOT thread-safe by itself — it's a plain `HashMap`
//! owned by one simulation instance and mutated only from the scheduler
//! task. External callers go through the scheduler's command channel.

use std::collections::HashMap;

use turncoat_protocol::PlayerId;

use crate::{allowed_from, can_transition, InteractionState, TransitionError};

/// Tracks each participant's interaction state for one simulation instance.
///
/// An absent entry is equivalent to [`InteractionState::Roaming`] — new
/// participants don't need registration before their first lookup, and
/// `remove` is indistinguishable from resetting someone to Roaming.
#[derive(Debug, Default)]
pub struct StateMachine {
    states: HashMap<PlayerId, InteractionState>,
}

impl StateMachine {
    /// Creates an empty state machine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded state, or Roaming for unknown participants.
    pub fn state_of(&self, participant: PlayerId) -> InteractionState {
        self.states
            .get(&participant)
            .copied()
            .unwrap_or_default()
    }

    /// Attempts a validated state change.
    ///
    /// Consults the legal-transition table; on success the mutation is
    /// applied, on failure nothing changes and the caller gets the
    /// attempted edge plus the legal alternatives. Failure is never
    /// swallowed at this layer — the scheduler decides per call site
    /// whether to surface or merely log it.
    pub fn transition(
        &mut self,
        participant: PlayerId,
        to: InteractionState,
    ) -> Result<(), TransitionError> {
        let from = self.state_of(participant);
        if !can_transition(from, to) {
            return Err(TransitionError::InvalidTransition {
                participant,
                from,
                to,
                allowed: allowed_from(from),
            });
        }

        self.states.insert(participant, to);
        tracing::debug!(%participant, %from, %to, "state transition");
        Ok(())
    }

    /// Unchecked initializer for first-time registration.
    ///
    /// Bypasses the table on purpose — lobby/role-assignment code uses
    /// this to seed a participant before the game starts. Everything
    /// after registration goes through [`transition`](Self::transition).
    pub fn set_state(&mut self, participant: PlayerId, state: InteractionState) {
        self.states.insert(participant, state);
    }

    /// Forgets a participant (departure). Their next lookup reads Roaming.
    pub fn remove(&mut self, participant: PlayerId) {
        self.states.remove(&participant);
    }

    /// Full-instance reset, used between games.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// All participants currently recorded in the given state.
    ///
    /// Order is unspecified (HashMap iteration). The timeout sweep pairs
    /// this with its own timestamp table, so ordering doesn't matter there.
    pub fn participants_in(&self, state: InteractionState) -> Vec<PlayerId> {
        self.states
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of explicitly recorded participants.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// `true` if no participant has an explicit state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use InteractionState::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    #[test]
    fn test_unknown_participant_reports_roaming() {
        let machine = StateMachine::new();
        assert_eq!(machine.state_of(pid(99)), Roaming);
    }

    #[test]
    fn test_transition_legal_edge_applies() {
        let mut machine = StateMachine::new();

        machine.transition(pid(1), Waiting).expect("Roaming -> Waiting is legal");

        assert_eq!(machine.state_of(pid(1)), Waiting);
    }

    #[test]
    fn test_transition_illegal_edge_fails_and_preserves_state() {
        let mut machine = StateMachine::new();
        machine.set_state(pid(1), Waiting);

        let result = machine.transition(pid(1), Summoned);

        assert!(matches!(
            result,
            Err(TransitionError::InvalidTransition { from: Waiting, to: Summoned, .. })
        ));
        assert_eq!(machine.state_of(pid(1)), Waiting, "failed transition must not mutate");
    }

    #[test]
    fn test_transition_error_names_legal_alternatives() {
        let mut machine = StateMachine::new();
        machine.set_state(pid(1), Interacting);

        let err = machine.transition(pid(1), Summoned).unwrap_err();

        let TransitionError::InvalidTransition { allowed, .. } = err;
        assert_eq!(allowed, &[Waiting, Roaming]);
    }

    #[test]
    fn test_transition_from_default_uses_roaming_row() {
        // No set_state call: the implicit Roaming default governs which
        // transitions are legal for a brand-new participant.
        let mut machine = StateMachine::new();

        assert!(machine.transition(pid(1), Summoned).is_ok());
        assert_eq!(machine.state_of(pid(1)), Summoned);
    }

    #[test]
    fn test_set_state_bypasses_table() {
        let mut machine = StateMachine::new();
        // Interacting is not reachable from nothing via Summoned, but
        // set_state doesn't care — it's the registration escape hatch.
        machine.set_state(pid(1), Summoned);
        assert_eq!(machine.state_of(pid(1)), Summoned);
    }

    #[test]
    fn test_remove_resets_to_roaming_default() {
        let mut machine = StateMachine::new();
        machine.set_state(pid(1), Waiting);

        machine.remove(pid(1));

        assert_eq!(machine.state_of(pid(1)), Roaming);
        assert!(machine.is_empty());
    }

    #[test]
    fn test_clear_forgets_everyone() {
        let mut machine = StateMachine::new();
        machine.set_state(pid(1), Waiting);
        machine.set_state(pid(2), Interacting);

        machine.clear();

        assert_eq!(machine.len(), 0);
        assert_eq!(machine.state_of(pid(1)), Roaming);
        assert_eq!(machine.state_of(pid(2)), Roaming);
    }

    #[test]
    fn test_participants_in_filters_by_state() {
        let mut machine = StateMachine::new();
        machine.set_state(pid(1), Waiting);
        machine.set_state(pid(2), Roaming);
        machine.set_state(pid(3), Waiting);

        let mut waiting = machine.participants_in(Waiting);
        waiting.sort_by_key(|p| p.0);

        assert_eq!(waiting, vec![pid(1), pid(3)]);
    }

    #[test]
    fn test_round_trip_through_waiting() {
        // The common per-tick cycle: prompt, act, return to Roaming.
        let mut machine = StateMachine::new();

        machine.transition(pid(1), Waiting).unwrap();
        machine.transition(pid(1), Roaming).unwrap();
        machine.transition(pid(1), Interacting).unwrap();
        machine.transition(pid(1), Waiting).unwrap();

        assert_eq!(machine.state_of(pid(1)), Waiting);
    }
}
