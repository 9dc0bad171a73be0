//! Error types for the presence layer.

use turncoat_protocol::PlayerId;

use crate::InteractionState;

/// Errors that can occur when mutating participant state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The attempted state change is not in the legal-transition table.
    ///
    /// Carries the attempted edge and the legal alternatives so callers
    /// (and log lines) can say exactly what would have been accepted.
    #[error("illegal transition for {participant}: {from} -> {to} (allowed from {from}: {allowed:?})")]
    InvalidTransition {
        participant: PlayerId,
        from: InteractionState,
        to: InteractionState,
        allowed: &'static [InteractionState],
    },
}
