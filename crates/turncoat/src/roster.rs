//! A basic in-memory participant roster.
//!
//! Real deployments usually already have a roster (lobby / role
//! assignment owns it); this one exists for integrators who don't, and
//! for tests. It's a shared map: the lobby side mutates it, the
//! scheduler side reads it through [`ParticipantDirectory`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use turncoat_protocol::{ParticipantInfo, ParticipantStatus, PlayerId};
use turncoat_tick::ParticipantDirectory;

/// Shared, thread-safe roster of participants and their statuses.
///
/// Cheap to clone — clones share the same underlying map. The lock is
/// held only for single map operations, never across await points.
#[derive(Clone, Default)]
pub struct Roster {
    inner: Arc<Mutex<HashMap<PlayerId, ParticipantStatus>>>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a participant as active (alive).
    pub fn add(&self, participant: PlayerId) {
        self.inner
            .lock()
            .expect("roster lock poisoned")
            .insert(participant, ParticipantStatus::Active);
        tracing::debug!(%participant, "participant added to roster");
    }

    /// Marks a participant inactive (killed or disconnected for good).
    /// They stop being prompted but still resolve in lookups.
    pub fn deactivate(&self, participant: PlayerId) {
        if let Some(status) = self
            .inner
            .lock()
            .expect("roster lock poisoned")
            .get_mut(&participant)
        {
            *status = ParticipantStatus::Inactive;
            tracing::debug!(%participant, "participant deactivated");
        }
    }

    /// Marks a participant active again (e.g. revived in a custom mode).
    pub fn activate(&self, participant: PlayerId) {
        if let Some(status) = self
            .inner
            .lock()
            .expect("roster lock poisoned")
            .get_mut(&participant)
        {
            *status = ParticipantStatus::Active;
        }
    }

    /// Removes a participant entirely (left the game).
    pub fn remove(&self, participant: PlayerId) {
        self.inner
            .lock()
            .expect("roster lock poisoned")
            .remove(&participant);
        tracing::debug!(%participant, "participant removed from roster");
    }

    /// Number of participants, any status.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("roster lock poisoned").len()
    }

    /// `true` if the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("roster lock poisoned").is_empty()
    }
}

impl ParticipantDirectory for Roster {
    fn lookup(&self, participant: PlayerId) -> Option<ParticipantInfo> {
        self.inner
            .lock()
            .expect("roster lock poisoned")
            .get(&participant)
            .map(|status| ParticipantInfo { status: *status })
    }

    fn active_ids(&self) -> Vec<PlayerId> {
        self.inner
            .lock()
            .expect("roster lock poisoned")
            .iter()
            .filter(|(_, s)| **s == ParticipantStatus::Active)
            .map(|(id, _)| *id)
            .collect()
    }
}
