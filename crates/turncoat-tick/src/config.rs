//! Scheduler configuration.

use std::time::Duration;

use tracing::warn;

/// Full configuration for one simulation instance's scheduler.
///
/// Everything here is fixed at construction — these are the only
/// externally tunable parameters of the coordination core.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// How often the scheduler fires. Default: 5 seconds.
    pub tick_interval: Duration,
    /// How long a prompted participant may sit in Waiting before the
    /// timeout sweep returns them to Roaming. Default: 30 seconds.
    pub action_timeout: Duration,
    /// How many ticks a room-entry stays hidden from occupancy queries.
    pub reveal_delay_ticks: u32,
    /// Random jitter (0–max µs) added before the *first* timer firing to
    /// desynchronize simulation instances created at the same instant
    /// (thundering-herd mitigation). The synchronous tick that `start()`
    /// runs is not jittered.
    pub initial_jitter_us: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
            action_timeout: Duration::from_secs(30),
            reveal_delay_ticks: 2,
            initial_jitter_us: 2_000, // 0–2 ms default jitter
        }
    }
}

impl TickConfig {
    /// Minimum supported tick interval.
    pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by the scheduler constructor. Rules:
    /// - `tick_interval` floored at [`Self::MIN_TICK_INTERVAL`].
    /// - `action_timeout` floored at `tick_interval` (a timeout shorter
    ///   than one tick would expire every prompt before anyone could act).
    pub fn validated(mut self) -> Self {
        if self.tick_interval < Self::MIN_TICK_INTERVAL {
            warn!(
                interval_ms = self.tick_interval.as_millis() as u64,
                min_ms = Self::MIN_TICK_INTERVAL.as_millis() as u64,
                "tick_interval below minimum — clamping"
            );
            self.tick_interval = Self::MIN_TICK_INTERVAL;
        }
        if self.action_timeout < self.tick_interval {
            warn!(
                timeout_ms = self.action_timeout.as_millis() as u64,
                interval_ms = self.tick_interval.as_millis() as u64,
                "action_timeout shorter than tick_interval — clamping"
            );
            self.action_timeout = self.tick_interval;
        }
        self
    }
}
