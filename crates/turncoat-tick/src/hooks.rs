//! The narrow interfaces the scheduler needs from the rest of the server.
//!
//! The coordinating owner (the match instance) wires these in at
//! construction. Each trait is the minimal capability for one concern —
//! the scheduler never sees the whole owner, which keeps the wiring free
//! of reference cycles.

use turncoat_protocol::{Direction, ParticipantInfo, PlayerId, RoomId, ServerEvent};

/// Read-only view of the participant roster.
///
/// The roster is owned by lobby/role-assignment code; the scheduler only
/// asks two questions: "does this participant exist?" and "who is alive?".
pub trait ParticipantDirectory {
    /// Looks up one participant. `None` means the id is not (or no
    /// longer) part of this game.
    fn lookup(&self, participant: PlayerId) -> Option<ParticipantInfo>;

    /// Every participant the prompt phase should consider, i.e. those
    /// whose status is active.
    fn active_ids(&self) -> Vec<PlayerId>;
}

/// Fire-and-forget event publication to the push channel.
///
/// No delivery confirmation — the scheduler publishes and moves on, the
/// same way a room actor drops messages for disconnected players.
pub trait EventSink {
    /// Delivers to every connected observer of this simulation instance.
    fn broadcast(&self, event: ServerEvent);

    /// Delivers to one observer.
    fn send_to(&self, participant: PlayerId, event: ServerEvent);
}

/// What a rule handler reports back after resolving an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action resolved without side effects the scheduler cares about.
    Resolved,
    /// The action carried the participant across a room boundary; the
    /// scheduler turns this into the paired leave/enter reveal records.
    Moved {
        from: RoomId,
        to: RoomId,
        direction: Direction,
    },
}

/// The rule handlers, one per action kind.
///
/// The scheduler matches [`ActionKind`](turncoat_protocol::ActionKind)
/// exhaustively and routes to exactly one of these methods — adding a
/// kind without a handler is a compile error, not a runtime log line.
/// Handlers own the actual game rules (movement legality, kill
/// eligibility, vote tallying); the scheduler only routes.
///
/// A returned `Err` is this batch entry failing: the scheduler logs it
/// and continues with the rest of the batch.
pub trait ActionRules {
    fn on_move(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_task(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_kill(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_vent(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_sabotage(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_report(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_vote(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;

    fn on_button(
        &mut self,
        participant: PlayerId,
        payload: &serde_json::Value,
    ) -> Result<ActionOutcome, String>;
}
