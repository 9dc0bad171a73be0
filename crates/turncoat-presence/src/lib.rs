//! Per-participant interaction state machine for Turncoat.
//!
//! Decides whether a participant may currently interact, wait for a
//! prompt, or sit in a forced group event — and validates every change
//! against a closed legal-transition table.
//!
//! # Key types
//!
//! - [`InteractionState`] — the four states
//! - [`StateMachine`] — keyed registry with validated transitions
//! - [`can_transition`] / [`allowed_from`] — the table, as pure lookups
//! - [`TransitionError`] — what an illegal edge looks like to callers

mod error;
mod machine;
mod state;

pub use error::TransitionError;
pub use machine::StateMachine;
pub use state::{allowed_from, can_transition, InteractionState};
