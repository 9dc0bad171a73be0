//! Events the scheduler publishes to the push channel.
//!
//! The push channel itself lives outside this core — we only define the
//! shapes. `#[serde(tag = "type")]` gives the internally tagged JSON the
//! client SDK expects: `{ "type": "ActionPrompt", "tick": 3, ... }`.

use serde::{Deserialize, Serialize};

/// What a broadcast prompt is asking participants to do.
///
/// The scheduler's own prompt phase always sends `Action`; meeting logic
/// (an external collaborator) reuses the same event shape with `Vote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    Action,
    Vote,
}

/// Events published by the tick scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Broadcast once per tick when at least one participant was moved
    /// into Waiting. One event regardless of how many were prompted.
    ActionPrompt {
        /// The tick that opened this submission window.
        tick: u64,
        prompt_type: PromptType,
        /// How long participants have to act before the timeout sweep
        /// returns them to Roaming.
        timeout_secs: u64,
    },

    /// Sent to one participant when they sat in Waiting past the action
    /// timeout without submitting anything.
    ActionTimeout { message: String },

    /// Broadcast at the end of every tick, for observability.
    TickComplete {
        tick: u64,
        /// Queue size observed at the start of the resolution phase.
        queue_size: usize,
    },
}
