//! Error types for the scheduler layer.

use turncoat_presence::{InteractionState, TransitionError};
use turncoat_protocol::PlayerId;

/// Why a submitted action was refused before entering the queue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Only Waiting and Interacting participants may act; everyone else
    /// gets an explicit rejection rather than a silent drop.
    #[error("{participant} may not act while {state} (must be Waiting or Interacting)")]
    NotAllowed {
        participant: PlayerId,
        state: InteractionState,
    },
}

/// Errors surfaced by the async scheduler handle.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The scheduler task is gone (shut down or panicked) — its command
    /// channel is closed.
    #[error("scheduler task is unavailable")]
    Unavailable,

    /// The submission was refused by the eligibility check.
    #[error(transparent)]
    Rejected(#[from] SubmitError),

    /// A directly requested state change was illegal.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
