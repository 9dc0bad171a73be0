//! The scheduler actor: one Tokio task that owns a [`TickCore`] and its
//! repeating timer.
//!
//! All external access — submissions from arbitrary request handlers,
//! lifecycle calls, inspection — goes through the actor's command channel,
//! which is what preserves the single-writer invariant on real threads:
//! the tables are only ever touched from inside this task.

use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant as TokioInstant};
use tracing::{debug, info};
use turncoat_presence::{InteractionState, TransitionError};
use turncoat_protocol::{Direction, PlayerId, QueuedAction, RevealKind, RoomId};
use turncoat_reveal::PendingReveal;

use crate::{
    ActionRules, EventSink, ParticipantDirectory, SchedulerError, SubmitError, TickConfig, TickCore,
};

/// Command channel size for the scheduler actor.
const CHANNEL_SIZE: usize = 64;

// ---------------------------------------------------------------------------
// Timer
// ---------------------------------------------------------------------------

/// The repeating tick timer, modeled as an explicit optional deadline.
///
/// `None` means stopped — `fired()` then pends forever, and the select
/// loop just processes commands. There is no separate timer task to
/// cancel, so `stop()`/`reset()` can never leave a dangling timer.
struct TickTimer {
    interval: Duration,
    next: Option<TokioInstant>,
}

impl TickTimer {
    fn new(interval: Duration) -> Self {
        Self { interval, next: None }
    }

    /// Arms the first deadline, with optional jitter to desynchronize
    /// instances started at the same instant.
    fn arm(&mut self, jitter_us: u64) {
        let jitter = if jitter_us > 0 {
            Duration::from_micros(rand::rng().random_range(0..jitter_us))
        } else {
            Duration::ZERO
        };
        self.next = Some(TokioInstant::now() + self.interval + jitter);
    }

    fn disarm(&mut self) {
        self.next = None;
    }

    fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// Resolves when the next tick is due; pends forever while disarmed.
    async fn fired(&mut self) {
        match self.next {
            Some(next) => {
                time::sleep_until(next).await;
                // Reschedule from now, not from the missed deadline — a
                // slow tick skips ahead instead of bursting to catch up.
                self.next = Some(TokioInstant::now() + self.interval);
            }
            None => std::future::pending().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Commands and snapshots
// ---------------------------------------------------------------------------

/// A snapshot of scheduler metadata, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerInfo {
    /// Ticks processed since start or the last reset.
    pub tick: u64,
    /// Whether the repeating timer is armed.
    pub running: bool,
    /// Actions currently buffered for the next resolution phase.
    pub queued_actions: usize,
    /// Participants with an explicitly recorded interaction state.
    pub tracked_participants: usize,
}

enum Command {
    Submit {
        action: QueuedAction,
        reply: oneshot::Sender<Result<(), SubmitError>>,
    },
    Start {
        reply: oneshot::Sender<()>,
    },
    Stop,
    Reset,
    Info {
        reply: oneshot::Sender<SchedulerInfo>,
    },
    StateOf {
        participant: PlayerId,
        reply: oneshot::Sender<InteractionState>,
    },
    Register {
        participant: PlayerId,
        state: InteractionState,
    },
    RemoveParticipant {
        participant: PlayerId,
    },
    Transition {
        participant: PlayerId,
        to: InteractionState,
        reply: oneshot::Sender<Result<(), TransitionError>>,
    },
    PendingActions {
        reply: oneshot::Sender<Vec<QueuedAction>>,
    },
    QueueReveal {
        participant: PlayerId,
        room: RoomId,
        direction: Direction,
        kind: RevealKind,
        reply: oneshot::Sender<PendingReveal>,
    },
    VisibleOccupants {
        room: RoomId,
        occupants: Vec<PlayerId>,
        reply: oneshot::Sender<Vec<PlayerId>>,
    },
    Shutdown,
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

struct SchedulerActor<D, E, R> {
    core: TickCore<D, E, R>,
    timer: TickTimer,
    receiver: mpsc::Receiver<Command>,
}

impl<D, E, R> SchedulerActor<D, E, R>
where
    D: ParticipantDirectory,
    E: EventSink,
    R: ActionRules,
{
    async fn run(mut self) {
        info!("scheduler actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle(cmd) {
                                break;
                            }
                        }
                        // All handles dropped — nothing can reach us.
                        None => break,
                    }
                }
                _ = self.timer.fired() => {
                    self.core.process_tick(TokioInstant::now().into_std());
                }
            }
        }

        info!("scheduler actor stopped");
    }

    /// Processes one command. Returns `true` on shutdown.
    fn handle(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Submit { action, reply } => {
                let _ = reply.send(self.core.queue_action(action));
            }
            Command::Start { reply } => {
                if self.timer.is_armed() {
                    debug!("start ignored — scheduler already running");
                } else {
                    info!("scheduler starting");
                    // First tick runs right away; the timer covers the rest.
                    self.core.process_tick(TokioInstant::now().into_std());
                    self.timer.arm(self.core.config().initial_jitter_us);
                }
                let _ = reply.send(());
            }
            Command::Stop => {
                if self.timer.is_armed() {
                    self.timer.disarm();
                    info!(tick = self.core.tick_count(), "scheduler stopped");
                } else {
                    debug!("stop ignored — scheduler not running");
                }
            }
            Command::Reset => {
                self.timer.disarm();
                self.core.reset_state();
            }
            Command::Info { reply } => {
                let _ = reply.send(SchedulerInfo {
                    tick: self.core.tick_count(),
                    running: self.timer.is_armed(),
                    queued_actions: self.core.action_queue().len(),
                    tracked_participants: self.core.state_machine().len(),
                });
            }
            Command::StateOf { participant, reply } => {
                let _ = reply.send(self.core.state_machine().state_of(participant));
            }
            Command::Register { participant, state } => {
                self.core.state_machine_mut().set_state(participant, state);
            }
            Command::RemoveParticipant { participant } => {
                self.core.state_machine_mut().remove(participant);
            }
            Command::Transition { participant, to, reply } => {
                let _ = reply.send(self.core.transition(participant, to, TokioInstant::now().into_std()));
            }
            Command::PendingActions { reply } => {
                let _ = reply.send(self.core.action_queue().peek_all().to_vec());
            }
            Command::QueueReveal { participant, room, direction, kind, reply } => {
                let reveal = self
                    .core
                    .reveal_queue_mut()
                    .queue_reveal(participant, room, direction, kind);
                let _ = reply.send(reveal);
            }
            Command::VisibleOccupants { room, occupants, reply } => {
                let _ = reply.send(self.core.reveal_queue().visible_occupants(room, &occupants));
            }
            Command::Shutdown => return true,
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Handle to a running scheduler actor. Cheap to clone; every connection
/// handler that forwards submissions holds one.
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: mpsc::Sender<Command>,
}

impl SchedulerHandle {
    async fn send(&self, cmd: Command) -> Result<(), SchedulerError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| SchedulerError::Unavailable)
    }

    /// Submits an action on behalf of a participant.
    ///
    /// Errors are explicit: `Rejected` when the participant isn't in a
    /// state that may act, `Unavailable` when the scheduler is gone.
    pub async fn queue_action(&self, action: QueuedAction) -> Result<(), SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Submit { action, reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| SchedulerError::Unavailable)?
            .map_err(SchedulerError::from)
    }

    /// Starts the repeating timer. Idempotent; the first tick runs
    /// immediately inside the actor, before the first timer firing.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Start { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Disarms the timer. Idempotent and safe at any time.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        self.send(Command::Stop).await
    }

    /// Stops the timer, clears all tables, rewinds the tick counter.
    pub async fn reset(&self) -> Result<(), SchedulerError> {
        self.send(Command::Reset).await
    }

    /// Snapshot of scheduler metadata.
    pub async fn info(&self) -> Result<SchedulerInfo, SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Info { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// A participant's current interaction state (Roaming if unknown).
    pub async fn state_of(&self, participant: PlayerId) -> Result<InteractionState, SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::StateOf { participant, reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Seeds a participant's state without table validation — the
    /// registration path used when a game starts.
    pub async fn register(
        &self,
        participant: PlayerId,
        state: InteractionState,
    ) -> Result<(), SchedulerError> {
        self.send(Command::Register { participant, state }).await
    }

    /// Forgets a departed participant.
    pub async fn remove_participant(&self, participant: PlayerId) -> Result<(), SchedulerError> {
        self.send(Command::RemoveParticipant { participant }).await
    }

    /// Requests a validated state change from outside the tick loop.
    /// Illegal edges surface as [`SchedulerError::Transition`].
    pub async fn transition(
        &self,
        participant: PlayerId,
        to: InteractionState,
    ) -> Result<(), SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Transition { participant, to, reply: reply_tx }).await?;
        reply_rx
            .await
            .map_err(|_| SchedulerError::Unavailable)?
            .map_err(SchedulerError::from)
    }

    /// Non-destructive view of the buffered actions.
    pub async fn pending_actions(&self) -> Result<Vec<QueuedAction>, SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::PendingActions { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Records one room-transition reveal. Movement collaborators may
    /// call this at any moment; it does not wait for a tick boundary.
    pub async fn queue_reveal(
        &self,
        participant: PlayerId,
        room: RoomId,
        direction: Direction,
        kind: RevealKind,
    ) -> Result<PendingReveal, SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueueReveal { participant, room, direction, kind, reply: reply_tx })
            .await?;
        reply_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Filters a room's occupants down to who is visible right now.
    pub async fn visible_occupants(
        &self,
        room: RoomId,
        occupants: Vec<PlayerId>,
    ) -> Result<Vec<PlayerId>, SchedulerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::VisibleOccupants { room, occupants, reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| SchedulerError::Unavailable)
    }

    /// Tells the actor to exit. Outstanding handles become `Unavailable`.
    pub async fn shutdown(&self) -> Result<(), SchedulerError> {
        self.send(Command::Shutdown).await
    }
}

/// Spawns a scheduler actor for one simulation instance and returns a
/// handle to it.
pub fn spawn_scheduler<D, E, R>(
    config: TickConfig,
    directory: D,
    events: E,
    rules: R,
) -> SchedulerHandle
where
    D: ParticipantDirectory + Send + 'static,
    E: EventSink + Send + 'static,
    R: ActionRules + Send + 'static,
{
    let config = config.validated();
    let interval = config.tick_interval;
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let actor = SchedulerActor {
        core: TickCore::new(config, directory, events, rules),
        timer: TickTimer::new(interval),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    SchedulerHandle { sender: tx }
}
