//! Shared test doubles for the scheduler's three collaborator traits.
//!
//! Everything is `Arc<Mutex<_>>`-backed so a test can keep a handle to
//! the same data the core (or the spawned actor) owns.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use turncoat_protocol::{
    ActionKind, Direction, ParticipantInfo, ParticipantStatus, PlayerId, RoomId, ServerEvent,
};
use turncoat_tick::{ActionOutcome, ActionRules, EventSink, ParticipantDirectory};

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// An in-memory roster the test can mutate mid-scenario.
#[derive(Clone, Default)]
pub struct TestRoster {
    inner: Arc<Mutex<HashMap<PlayerId, ParticipantStatus>>>,
}

impl TestRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(ids: &[u64]) -> Self {
        let roster = Self::new();
        for id in ids {
            roster.add_active(PlayerId(*id));
        }
        roster
    }

    pub fn add_active(&self, id: PlayerId) {
        self.inner.lock().unwrap().insert(id, ParticipantStatus::Active);
    }

    pub fn add_inactive(&self, id: PlayerId) {
        self.inner.lock().unwrap().insert(id, ParticipantStatus::Inactive);
    }

    pub fn remove(&self, id: PlayerId) {
        self.inner.lock().unwrap().remove(&id);
    }
}

impl ParticipantDirectory for TestRoster {
    fn lookup(&self, participant: PlayerId) -> Option<ParticipantInfo> {
        self.inner
            .lock()
            .unwrap()
            .get(&participant)
            .map(|status| ParticipantInfo { status: *status })
    }

    fn active_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, s)| **s == ParticipantStatus::Active)
            .map(|(id, _)| *id)
            .collect();
        // Deterministic prompt order for assertions.
        ids.sort_by_key(|p| p.0);
        ids
    }
}

// ---------------------------------------------------------------------------
// Event sink
// ---------------------------------------------------------------------------

/// One delivered event, with its addressing.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Broadcast(ServerEvent),
    Direct(PlayerId, ServerEvent),
}

/// Records every published event in order.
#[derive(Clone, Default)]
pub struct RecordingSink {
    deliveries: Arc<Mutex<Vec<Delivery>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in publication order.
    pub fn all(&self) -> Vec<Delivery> {
        self.deliveries.lock().unwrap().clone()
    }

    /// Only the broadcasts.
    pub fn broadcasts(&self) -> Vec<ServerEvent> {
        self.all()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Broadcast(e) => Some(e),
                Delivery::Direct(..) => None,
            })
            .collect()
    }

    /// Only the targeted sends.
    pub fn directs(&self) -> Vec<(PlayerId, ServerEvent)> {
        self.all()
            .into_iter()
            .filter_map(|d| match d {
                Delivery::Direct(p, e) => Some((p, e)),
                Delivery::Broadcast(_) => None,
            })
            .collect()
    }

    /// Drops everything recorded so far.
    pub fn drain(&self) {
        self.deliveries.lock().unwrap().clear();
    }
}

impl EventSink for RecordingSink {
    fn broadcast(&self, event: ServerEvent) {
        self.deliveries.lock().unwrap().push(Delivery::Broadcast(event));
    }

    fn send_to(&self, participant: PlayerId, event: ServerEvent) {
        self.deliveries.lock().unwrap().push(Delivery::Direct(participant, event));
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Scriptable rule handlers: records every dispatch, can be told to fail
/// for specific participants or to report a room transition on move.
#[derive(Clone, Default)]
pub struct ScriptedRules {
    calls: Arc<Mutex<Vec<(PlayerId, ActionKind)>>>,
    failing: Arc<Mutex<HashSet<PlayerId>>>,
    moves: Arc<Mutex<HashMap<PlayerId, (RoomId, RoomId, Direction)>>>,
}

impl ScriptedRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(participant, kind)` dispatched, in resolution order.
    pub fn calls(&self) -> Vec<(PlayerId, ActionKind)> {
        self.calls.lock().unwrap().clone()
    }

    /// Makes every handler fail for this participant.
    pub fn fail_for(&self, participant: PlayerId) {
        self.failing.lock().unwrap().insert(participant);
    }

    /// Makes `on_move` report this room transition for the participant.
    pub fn move_outcome(&self, participant: PlayerId, from: RoomId, to: RoomId, dir: Direction) {
        self.moves.lock().unwrap().insert(participant, (from, to, dir));
    }

    fn dispatch(&self, participant: PlayerId, kind: ActionKind) -> Result<ActionOutcome, String> {
        self.calls.lock().unwrap().push((participant, kind));
        if self.failing.lock().unwrap().contains(&participant) {
            return Err("scripted failure".into());
        }
        if kind == ActionKind::Move {
            if let Some((from, to, direction)) = self.moves.lock().unwrap().get(&participant) {
                return Ok(ActionOutcome::Moved {
                    from: *from,
                    to: *to,
                    direction: *direction,
                });
            }
        }
        Ok(ActionOutcome::Resolved)
    }
}

impl ActionRules for ScriptedRules {
    fn on_move(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Move)
    }

    fn on_task(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Task)
    }

    fn on_kill(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Kill)
    }

    fn on_vent(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Vent)
    }

    fn on_sabotage(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Sabotage)
    }

    fn on_report(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Report)
    }

    fn on_vote(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Vote)
    }

    fn on_button(&mut self, p: PlayerId, _: &serde_json::Value) -> Result<ActionOutcome, String> {
        self.dispatch(p, ActionKind::Button)
    }
}
