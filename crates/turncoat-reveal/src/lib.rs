//! The pending-reveal queue: a countdown ledger for room transitions.
//!
//! When a participant crosses from one room to another, observers in the
//! destination shouldn't see them instantly — the entry stays hidden for a
//! fixed number of ticks (the "reveal delay"), which is the information-delay
//! mechanic that keeps kills deniable. This crate is the passive ledger for
//! that: it records transitions, counts them down, and answers visibility
//! queries. It never dispatches anything itself.

use serde::{Deserialize, Serialize};
use turncoat_protocol::{Direction, PlayerId, RevealKind, RoomId};

/// One in-flight room-transition record.
///
/// Created by [`PendingRevealQueue::queue_reveal`] with `ticks_remaining`
/// at the queue's configured delay. Counts down to zero, where it becomes
/// "ready" — ready records are NOT auto-deleted; the consumer removes them
/// once it has acted on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReveal {
    /// Internal sequence number; makes removal-by-value unambiguous even
    /// when the same participant crosses the same doorway twice.
    pub id: u64,
    pub participant: PlayerId,
    pub room: RoomId,
    pub direction: Direction,
    pub ticks_remaining: u32,
    pub kind: RevealKind,
}

impl PendingReveal {
    /// `true` once the countdown has reached zero.
    pub fn is_ready(&self) -> bool {
        self.ticks_remaining == 0
    }
}

/// The queue of pending reveals for one simulation instance.
#[derive(Debug)]
pub struct PendingRevealQueue {
    reveals: Vec<PendingReveal>,
    /// Fixed countdown every new record starts at.
    delay_ticks: u32,
    next_id: u64,
}

impl PendingRevealQueue {
    /// Default reveal delay, in ticks.
    pub const DEFAULT_DELAY_TICKS: u32 = 2;

    /// Creates a queue whose records start at `delay_ticks`.
    pub fn new(delay_ticks: u32) -> Self {
        Self {
            reveals: Vec::new(),
            delay_ticks,
            next_id: 1,
        }
    }

    /// The configured starting countdown.
    pub fn delay_ticks(&self) -> u32 {
        self.delay_ticks
    }

    /// Records one transition and returns a copy of the new record.
    pub fn queue_reveal(
        &mut self,
        participant: PlayerId,
        room: RoomId,
        direction: Direction,
        kind: RevealKind,
    ) -> PendingReveal {
        let reveal = PendingReveal {
            id: self.next_id,
            participant,
            room,
            direction,
            ticks_remaining: self.delay_ticks,
            kind,
        };
        self.next_id += 1;

        tracing::debug!(
            %participant,
            %room,
            %direction,
            ?kind,
            ticks = self.delay_ticks,
            "reveal queued"
        );

        self.reveals.push(reveal.clone());
        reveal
    }

    /// Records the pair produced by one cross-room movement: a Leave in
    /// the source room facing opposite to the travel direction, and an
    /// Enter in the destination facing the travel direction itself.
    ///
    /// Returns `(leave, enter)`.
    pub fn queue_movement(
        &mut self,
        participant: PlayerId,
        from: RoomId,
        to: RoomId,
        direction: Direction,
    ) -> (PendingReveal, PendingReveal) {
        let leave = self.queue_reveal(participant, from, direction.opposite(), RevealKind::Leave);
        let enter = self.queue_reveal(participant, to, direction, RevealKind::Enter);
        (leave, enter)
    }

    /// Records for `room` that are still counting down.
    ///
    /// Records at zero are "ready" and excluded from this view — use
    /// [`ready_reveals`](Self::ready_reveals) for those.
    pub fn pending_for_room(&self, room: RoomId) -> Vec<&PendingReveal> {
        self.reveals
            .iter()
            .filter(|r| r.room == room && r.ticks_remaining > 0)
            .collect()
    }

    /// Advances the clock: every record loses one tick, floored at zero.
    pub fn decrement_all(&mut self) {
        for reveal in &mut self.reveals {
            reveal.ticks_remaining = reveal.ticks_remaining.saturating_sub(1);
        }
    }

    /// Exactly the records whose countdown has finished.
    pub fn ready_reveals(&self) -> Vec<&PendingReveal> {
        self.reveals.iter().filter(|r| r.is_ready()).collect()
    }

    /// Deletes one record by value match. `true` if something was removed.
    pub fn remove(&mut self, reveal: &PendingReveal) -> bool {
        if let Some(pos) = self.reveals.iter().position(|r| r == reveal) {
            self.reveals.remove(pos);
            true
        } else {
            false
        }
    }

    /// Empties the ledger and resets the internal id counter.
    pub fn clear(&mut self) {
        self.reveals.clear();
        self.next_id = 1;
    }

    /// Total records, pending and ready.
    pub fn len(&self) -> usize {
        self.reveals.len()
    }

    /// `true` if the ledger holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.reveals.is_empty()
    }

    /// Filters a room's occupant list down to who is actually visible.
    ///
    /// An occupant with a pending Enter record (still counting down) in
    /// this room hasn't "arrived" yet from the observers' point of view
    /// and is hidden. Leave records never hide anyone — the departed body
    /// is still where it fell, so to speak.
    pub fn visible_occupants(&self, room: RoomId, occupants: &[PlayerId]) -> Vec<PlayerId> {
        occupants
            .iter()
            .copied()
            .filter(|p| {
                !self.reveals.iter().any(|r| {
                    r.room == room
                        && r.participant == *p
                        && r.kind == RevealKind::Enter
                        && r.ticks_remaining > 0
                })
            })
            .collect()
    }
}

impl Default for PendingRevealQueue {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY_TICKS)
    }
}

// =========================================================================
// Tests
// =========================================================================
