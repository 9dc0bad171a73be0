//! # Turncoat
//!
//! Real-time turn-coordination core for multiplayer social-deduction
//! games.
//!
//! Turncoat batches participant actions into fixed-interval ticks,
//! tracks who may act through a validated interaction state machine,
//! and delays room-transition reveals so late joiners of a room don't
//! instantly learn who just walked in. Game servers implement one
//! [`ActionRules`] trait and the crate handles prompting, timeouts,
//! resolution order, and reveal countdowns.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turncoat::prelude::*;
//!
//! // Implement ActionRules for your game, then:
//! // let (sim, mut events) = Simulation::spawn(TickConfig::default(), MyRules::new());
//! // sim.join(PlayerId(1)).await?;
//! // sim.start().await?;
//! // while let Some(out) = events.recv().await { /* deliver */ }
//! ```

mod roster;
mod simulation;
mod sink;

pub use roster::Roster;
pub use simulation::Simulation;
pub use sink::{ChannelSink, Outbound};

pub use turncoat_actions::ActionQueue;
pub use turncoat_presence::{InteractionState, StateMachine, TransitionError};
pub use turncoat_protocol::{
    ActionKind, Direction, ParticipantInfo, ParticipantStatus, PlayerId, PromptType, QueuedAction,
    RevealKind, RoomId, ServerEvent,
};
pub use turncoat_reveal::{PendingReveal, PendingRevealQueue};
pub use turncoat_tick::{
    ActionOutcome, ActionRules, EventSink, ParticipantDirectory, SchedulerError, SchedulerHandle,
    SchedulerInfo, SubmitError, TickConfig, TickCore,
};

/// Everything an integrator typically needs in one import.
pub mod prelude {
    pub use crate::{
        ActionKind, ActionOutcome, ActionRules, Direction, InteractionState, Outbound, PlayerId,
        QueuedAction, RevealKind, RoomId, SchedulerError, ServerEvent, Simulation, TickConfig,
    };
}
