//! The synchronous tick core: four ordered phases over one game's state.
//!
//! `TickCore` owns every table the scheduler mutates — the action queue,
//! the participant state machine, the reveal ledger, and the prompt
//! timestamps — and is driven either by the actor in [`crate::scheduler`]
//! or directly by tests. Nothing here blocks or suspends.
//!
//! # Failure containment
//!
//! Everything that can go wrong inside a tick is contained within that
//! tick: a failed transition in the sweep is logged per participant, a
//! failed rule handler is logged per action, and neither stops the rest
//! of its batch or the next tick. Only operations invoked from outside
//! the tick loop (`queue_action`, `transition`) surface errors to their
//! caller.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};
use turncoat_actions::ActionQueue;
use turncoat_presence::{InteractionState, StateMachine, TransitionError};
use turncoat_protocol::{ActionKind, PlayerId, PromptType, QueuedAction, ServerEvent};
use turncoat_reveal::PendingRevealQueue;

use crate::{ActionOutcome, ActionRules, EventSink, ParticipantDirectory, SubmitError, TickConfig};

/// The turn-coordination state for one simulation instance.
pub struct TickCore<D, E, R> {
    config: TickConfig,
    tick_count: u64,
    queue: ActionQueue,
    presence: StateMachine,
    reveals: PendingRevealQueue,
    /// When each currently-Waiting participant was prompted. Entries are
    /// added by the prompt phase and removed on resolution or timeout.
    prompted_at: HashMap<PlayerId, Instant>,
    directory: D,
    events: E,
    rules: R,
}

impl<D, E, R> TickCore<D, E, R>
where
    D: ParticipantDirectory,
    E: EventSink,
    R: ActionRules,
{
    /// Builds a core with freshly created tables.
    ///
    /// The collaborators are injected here and owned for the core's
    /// lifetime; no global or shared state is involved.
    pub fn new(config: TickConfig, directory: D, events: E, rules: R) -> Self {
        let config = config.validated();
        let reveals = PendingRevealQueue::new(config.reveal_delay_ticks);
        Self {
            config,
            tick_count: 0,
            queue: ActionQueue::new(),
            presence: StateMachine::new(),
            reveals,
            prompted_at: HashMap::new(),
            directory,
            events,
            rules,
        }
    }

    /// Runs one full tick: timeout sweep, prompt phase, action
    /// resolution, completion broadcast — strictly in that order.
    pub fn process_tick(&mut self, now: Instant) {
        self.tick_count += 1;
        let tick = self.tick_count;
        debug!(tick, "tick started");

        self.sweep_timeouts(now, tick);
        self.prompt_participants(now, tick);
        let queue_size = self.resolve_actions(tick);

        self.events.broadcast(ServerEvent::TickComplete { tick, queue_size });
        debug!(tick, queue_size, "tick complete");
    }

    /// Phase 1: return unresponsive Waiting participants to Roaming.
    ///
    /// Each participant's timeout handling is independent — one failure
    /// is logged and the sweep keeps going.
    fn sweep_timeouts(&mut self, now: Instant, tick: u64) {
        let timed_out: Vec<PlayerId> = self
            .prompted_at
            .iter()
            .filter(|(id, prompted)| {
                now.duration_since(**prompted) >= self.config.action_timeout
                    && self.presence.state_of(**id) == InteractionState::Waiting
            })
            .map(|(id, _)| *id)
            .collect();

        for participant in timed_out {
            match self.presence.transition(participant, InteractionState::Roaming) {
                Ok(()) => {
                    self.prompted_at.remove(&participant);
                    info!(tick, %participant, "action timeout, returned to Roaming");
                    self.events.send_to(
                        participant,
                        ServerEvent::ActionTimeout {
                            message: "no action received before the deadline".into(),
                        },
                    );
                }
                Err(err) => {
                    // State changed under us; leave them to the next sweep.
                    warn!(tick, %participant, %err, "timeout sweep transition failed");
                }
            }
        }
    }

    /// Phase 2: open a submission window for every eligible participant.
    ///
    /// Participants already Waiting or Summoned are skipped (idempotent).
    /// One broadcast covers the whole prompted set, however large.
    fn prompt_participants(&mut self, now: Instant, tick: u64) {
        let mut prompted = Vec::new();

        for participant in self.directory.active_ids() {
            let state = self.presence.state_of(participant);
            if matches!(state, InteractionState::Waiting | InteractionState::Summoned) {
                continue;
            }

            match self.presence.transition(participant, InteractionState::Waiting) {
                Ok(()) => {
                    self.prompted_at.insert(participant, now);
                    prompted.push(participant);
                }
                Err(err) => {
                    warn!(tick, %participant, %err, "prompt transition failed");
                }
            }
        }

        if !prompted.is_empty() {
            debug!(tick, count = prompted.len(), "participants prompted");
            self.events.broadcast(ServerEvent::ActionPrompt {
                tick,
                prompt_type: PromptType::Action,
                timeout_secs: self.config.action_timeout.as_secs(),
            });
        }
    }

    /// Phase 3: drain and resolve the batch. Returns the queue size
    /// observed at the start of the phase, for the completion event.
    ///
    /// The reveal countdown is also driven here, once per tick — the
    /// delay is measured in ticks, so this phase is its clock.
    fn resolve_actions(&mut self, tick: u64) -> usize {
        self.reveals.decrement_all();

        let queue_size = self.queue.len();
        if queue_size == 0 {
            return 0;
        }

        let batch = self.queue.dequeue_all();
        for action in batch {
            self.resolve_one(action, tick);
        }
        queue_size
    }

    /// Resolves a single action. Any failure is contained here so the
    /// rest of the batch still runs.
    fn resolve_one(&mut self, action: QueuedAction, tick: u64) {
        let participant = action.participant;

        if self.directory.lookup(participant).is_none() {
            warn!(tick, %participant, "action references unknown participant, skipping");
            return;
        }

        let result = match action.kind {
            ActionKind::Move => self.rules.on_move(participant, &action.payload),
            ActionKind::Task => self.rules.on_task(participant, &action.payload),
            ActionKind::Kill => self.rules.on_kill(participant, &action.payload),
            ActionKind::Vent => self.rules.on_vent(participant, &action.payload),
            ActionKind::Sabotage => self.rules.on_sabotage(participant, &action.payload),
            ActionKind::Report => self.rules.on_report(participant, &action.payload),
            ActionKind::Vote => self.rules.on_vote(participant, &action.payload),
            ActionKind::Button => self.rules.on_button(participant, &action.payload),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!(tick, %participant, kind = %action.kind, %reason, "action handler failed");
                return;
            }
        };

        if let ActionOutcome::Moved { from, to, direction } = outcome {
            self.reveals.queue_movement(participant, from, to, direction);
        }

        // Acting closes the submission window. Interacting participants
        // stay where they are — their task flow decides when they leave.
        if self.presence.state_of(participant) == InteractionState::Waiting {
            match self.presence.transition(participant, InteractionState::Roaming) {
                Ok(()) => {
                    self.prompted_at.remove(&participant);
                }
                Err(err) => {
                    warn!(tick, %participant, %err, "post-action transition failed");
                }
            }
        }
    }

    /// Submits an action on behalf of a participant.
    ///
    /// The eligibility gate: only Waiting and Interacting participants
    /// may act. Anyone else gets an explicit rejection and the action
    /// never touches the queue.
    pub fn queue_action(&mut self, action: QueuedAction) -> Result<(), SubmitError> {
        let participant = action.participant;
        let state = self.presence.state_of(participant);

        match state {
            InteractionState::Waiting | InteractionState::Interacting => {
                debug!(%participant, kind = %action.kind, "action queued");
                self.queue.enqueue(action);
                Ok(())
            }
            other => {
                warn!(%participant, state = %other, kind = %action.kind, "submission rejected");
                Err(SubmitError::NotAllowed { participant, state: other })
            }
        }
    }

    /// Validated state change requested from outside the tick loop
    /// (e.g. meeting logic summoning everyone). Errors surface to the
    /// caller here, unlike inside the sweep/prompt loops.
    ///
    /// Prompt bookkeeping follows the state: leaving Waiting closes the
    /// submission window (so a later re-entry can't inherit a stale
    /// timestamp and time out early), and entering Waiting directly
    /// opens a fresh window timed from `now`.
    pub fn transition(
        &mut self,
        participant: PlayerId,
        to: InteractionState,
        now: Instant,
    ) -> Result<(), TransitionError> {
        let from = self.presence.state_of(participant);
        self.presence.transition(participant, to)?;

        if from == InteractionState::Waiting {
            self.prompted_at.remove(&participant);
        }
        if to == InteractionState::Waiting {
            self.prompted_at.insert(participant, now);
        }
        Ok(())
    }

    /// Clears every table and rewinds the tick counter. Used between
    /// games; the collaborators and config are kept.
    pub fn reset_state(&mut self) {
        self.queue.clear();
        self.presence.clear();
        self.prompted_at.clear();
        self.reveals.clear();
        self.tick_count = 0;
        info!("scheduler state reset");
    }

    // -- Inspection -------------------------------------------------------

    /// Ticks processed since construction or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The action queue (read-only).
    pub fn action_queue(&self) -> &ActionQueue {
        &self.queue
    }

    /// The participant state machine (read-only).
    pub fn state_machine(&self) -> &StateMachine {
        &self.presence
    }

    /// The participant state machine, mutable — for registration and
    /// departure paths that bypass the transition table on purpose.
    pub fn state_machine_mut(&mut self) -> &mut StateMachine {
        &mut self.presence
    }

    /// The reveal ledger (read-only).
    pub fn reveal_queue(&self) -> &PendingRevealQueue {
        &self.reveals
    }

    /// The reveal ledger, mutable — the movement collaborator feeds it
    /// independently of the tick boundary.
    pub fn reveal_queue_mut(&mut self) -> &mut PendingRevealQueue {
        &mut self.reveals
    }

    /// Whether a prompt timestamp is currently tracked for `participant`.
    pub fn is_awaiting_action(&self, participant: PlayerId) -> bool {
        self.prompted_at.contains_key(&participant)
    }

    /// The active configuration.
    pub fn config(&self) -> &TickConfig {
        &self.config
    }
}
