//! Shared types for the Turncoat turn-coordination core.
//!
//! This crate is the vocabulary every other crate speaks: identity newtypes,
//! the closed [`ActionKind`] set, the [`QueuedAction`] record, compass
//! [`Direction`]s for the reveal system, and the [`ServerEvent`] shapes the
//! scheduler publishes.

mod events;
mod types;

pub use events::{PromptType, ServerEvent};
pub use types::{
    ActionKind, Direction, ParticipantInfo, ParticipantStatus, PlayerId, QueuedAction,
    RevealKind, RoomId,
};
