//! The top-level coordination object a game server embeds.
//!
//! A [`Simulation`] owns one scheduler actor and the roster it prompts
//! from, and wires the built-in [`ChannelSink`] in between. Integrators
//! supply only the rules: what each action kind actually does.

use tokio::sync::mpsc;
use turncoat_presence::InteractionState;
use turncoat_protocol::{PlayerId, QueuedAction};
use turncoat_tick::{
    spawn_scheduler, ActionRules, SchedulerError, SchedulerHandle, SchedulerInfo, TickConfig,
};

use crate::roster::Roster;
use crate::sink::{ChannelSink, Outbound};

/// One running game's coordination core: scheduler, roster, event feed.
///
/// Cheap to clone. All clones talk to the same scheduler actor and the
/// same roster, so a connection handler can hold its own copy.
#[derive(Clone)]
pub struct Simulation {
    scheduler: SchedulerHandle,
    roster: Roster,
}

impl Simulation {
    /// Spawns the scheduler for a new game and returns the simulation
    /// together with the receiver its outbound events arrive on.
    ///
    /// The caller owns delivery: drain the receiver and push each
    /// [`Outbound`] to the right connections.
    pub fn spawn<R>(config: TickConfig, rules: R) -> (Self, mpsc::UnboundedReceiver<Outbound>)
    where
        R: ActionRules + Send + 'static,
    {
        let roster = Roster::new();
        let (sink, events) = ChannelSink::new();
        let scheduler = spawn_scheduler(config, roster.clone(), sink, rules);

        (Self { scheduler, roster }, events)
    }

    /// The roster backing this simulation. Lobby code mutates statuses
    /// through this; the scheduler reads them at each prompt phase.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Direct access to the scheduler handle, for operations not
    /// wrapped here (reveals, raw transitions, inspection).
    pub fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    // -- participant lifecycle ---------------------------------------------

    /// Adds a participant: active on the roster, Roaming in the state
    /// tables.
    pub async fn join(&self, participant: PlayerId) -> Result<(), SchedulerError> {
        self.roster.add(participant);
        self.scheduler
            .register(participant, InteractionState::Roaming)
            .await
    }

    /// Removes a participant from the roster and the state tables.
    pub async fn leave(&self, participant: PlayerId) -> Result<(), SchedulerError> {
        self.roster.remove(participant);
        self.scheduler.remove_participant(participant).await
    }

    // -- scheduler lifecycle -----------------------------------------------

    /// Starts the tick loop. The first tick runs immediately.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        self.scheduler.start().await
    }

    /// Pauses the tick loop without losing state.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        self.scheduler.stop().await
    }

    /// Stops and clears everything back to a fresh game.
    pub async fn reset(&self) -> Result<(), SchedulerError> {
        self.scheduler.reset().await
    }

    /// Stops the scheduler actor for good.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        self.scheduler.shutdown().await
    }

    // -- gameplay ------------------------------------------------------------

    /// Submits a participant's action for the next resolution phase.
    pub async fn queue_action(&self, action: QueuedAction) -> Result<(), SchedulerError> {
        self.scheduler.queue_action(action).await
    }

    /// A participant's current interaction state.
    pub async fn state_of(&self, participant: PlayerId) -> Result<InteractionState, SchedulerError> {
        self.scheduler.state_of(participant).await
    }

    /// Snapshot of scheduler metadata.
    pub async fn info(&self) -> Result<SchedulerInfo, SchedulerError> {
        self.scheduler.info().await
    }
}
