//! Core shared types for Turncoat's turn-coordination layer.
//!
//! Everything here crosses a crate boundary: identity newtypes, the closed
//! set of action kinds, the queued-action record, and the compass directions
//! used by the reveal system. All of it is serde-serializable because these
//! shapes also travel to clients through the push channel.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a participant in a simulation instance.
///
/// Newtype over `u64` so a participant id can't be confused with a room id
/// even though both are plain integers underneath. `#[serde(transparent)]`
/// keeps the JSON representation a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room on the map.
///
/// A room here is a location within one game's map (cafeteria, reactor, ...),
/// not a match instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Participant status (roster view)
// ---------------------------------------------------------------------------

/// Whether a participant is eligible to be prompted for actions.
///
/// The roster (an external collaborator) owns this; the scheduler only
/// reads it. Dead or disconnected participants are `Inactive` and are
/// skipped by the prompt phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Inactive,
}

/// The roster's record of one participant, as seen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub status: ParticipantStatus,
}

impl ParticipantInfo {
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}

// ---------------------------------------------------------------------------
// Action kinds
// ---------------------------------------------------------------------------

/// The closed set of actions a participant can submit.
///
/// This is deliberately a fieldless enum rather than a string tag: the
/// scheduler matches it exhaustively when routing to rule handlers, so a
/// new kind is a compile error at every dispatch site instead of a silent
/// "unknown kind" log line at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Move,
    Task,
    Kill,
    Vent,
    Sabotage,
    Report,
    Vote,
    Button,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Move => "move",
            Self::Task => "task",
            Self::Kill => "kill",
            Self::Vent => "vent",
            Self::Sabotage => "sabotage",
            Self::Report => "report",
            Self::Vote => "vote",
            Self::Button => "button",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// QueuedAction
// ---------------------------------------------------------------------------

/// One submitted action awaiting resolution.
///
/// Created when a participant submits, owned by the action queue until the
/// scheduler drains it, then handed to the rule handler for exactly one
/// resolution call. The `payload` is opaque to the coordination layer —
/// only the handler for the matching `kind` knows its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedAction {
    /// Who submitted the action.
    pub participant: PlayerId,
    /// Which kind of action this is (decides the rule handler).
    pub kind: ActionKind,
    /// Milliseconds since the server epoch at submission time.
    pub submitted_at: u64,
    /// Kind-specific data, uninterpreted by the scheduler.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl QueuedAction {
    /// Convenience constructor for actions without a payload.
    pub fn new(participant: PlayerId, kind: ActionKind, submitted_at: u64) -> Self {
        Self {
            participant,
            kind,
            submitted_at,
            payload: serde_json::Value::Null,
        }
    }
}

// ---------------------------------------------------------------------------
// Directions (reveal system)
// ---------------------------------------------------------------------------

/// A compass direction between two adjacent rooms on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// The opposite compass direction.
    ///
    /// A movement east out of a room is observed as a departure to the
    /// *west* wall from inside the destination's perspective pairing.
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// The direction of travel from one grid position to an adjacent one.
    ///
    /// Positions are `(x, y)` with x growing east and y growing south.
    /// Returns `None` for non-adjacent or identical positions — diagonal
    /// moves are not a thing on this map.
    pub fn between(from: (i32, i32), to: (i32, i32)) -> Option<Self> {
        match (to.0 - from.0, to.1 - from.1) {
            (1, 0) => Some(Self::East),
            (-1, 0) => Some(Self::West),
            (0, 1) => Some(Self::South),
            (0, -1) => Some(Self::North),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        };
        write!(f, "{name}")
    }
}

/// Whether a pending reveal records someone entering or leaving a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealKind {
    Enter,
    Leave,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! JSON-shape tests: clients parse these types, so the serde
    //! attributes have to produce exactly the documented format.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RoomId(3)).unwrap();
        assert_eq!(json, "3");
        assert_eq!(RoomId(3).to_string(), "R-3");
    }

    #[test]
    fn test_action_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ActionKind::Sabotage).unwrap();
        assert_eq!(json, "\"sabotage\"");
    }

    #[test]
    fn test_action_kind_deserializes_from_lowercase() {
        let kind: ActionKind = serde_json::from_str("\"vent\"").unwrap();
        assert_eq!(kind, ActionKind::Vent);
    }

    #[test]
    fn test_action_kind_unknown_tag_is_rejected() {
        // A closed enum: anything outside the eight kinds fails to parse
        // at the boundary instead of reaching the dispatch loop.
        let result: Result<ActionKind, _> = serde_json::from_str("\"teleport\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_queued_action_round_trip() {
        let action = QueuedAction {
            participant: PlayerId(1),
            kind: ActionKind::Vote,
            submitted_at: 15000,
            payload: serde_json::json!({ "target": 4 }),
        };
        let bytes = serde_json::to_vec(&action).unwrap();
        let decoded: QueuedAction = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(action, decoded);
    }

    #[test]
    fn test_queued_action_payload_defaults_to_null() {
        let json = r#"{ "participant": 1, "kind": "task", "submitted_at": 0 }"#;
        let action: QueuedAction = serde_json::from_str(json).unwrap();
        assert_eq!(action.payload, serde_json::Value::Null);
    }

    #[test]
    fn test_direction_opposite_pairs() {
        assert_eq!(Direction::North.opposite(), Direction::South);
        assert_eq!(Direction::South.opposite(), Direction::North);
        assert_eq!(Direction::East.opposite(), Direction::West);
        assert_eq!(Direction::West.opposite(), Direction::East);
    }

    #[test]
    fn test_direction_between_adjacent_rooms() {
        assert_eq!(Direction::between((0, 0), (1, 0)), Some(Direction::East));
        assert_eq!(Direction::between((1, 0), (0, 0)), Some(Direction::West));
        assert_eq!(Direction::between((2, 2), (2, 3)), Some(Direction::South));
        assert_eq!(Direction::between((2, 3), (2, 2)), Some(Direction::North));
    }

    #[test]
    fn test_direction_between_rejects_non_adjacent() {
        assert_eq!(Direction::between((0, 0), (0, 0)), None);
        assert_eq!(Direction::between((0, 0), (2, 0)), None);
        assert_eq!(Direction::between((0, 0), (1, 1)), None);
    }

    #[test]
    fn test_participant_status_is_active() {
        assert!(ParticipantInfo { status: ParticipantStatus::Active }.is_active());
        assert!(!ParticipantInfo { status: ParticipantStatus::Inactive }.is_active());
    }

    #[test]
    fn test_reveal_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RevealKind::Enter).unwrap(), "\"enter\"");
        assert_eq!(serde_json::to_string(&RevealKind::Leave).unwrap(), "\"leave\"");
    }
}
