//! Tick scheduler and turn-coordination core for Turncoat.
//!
//! One scheduler per game. Each timer firing runs four ordered phases:
//! timeout sweep, prompt phase, action resolution, completion broadcast.
//! Submissions may arrive at any wall-clock moment from arbitrary request
//! handlers; they reach the scheduler's tables only through its command
//! channel, so the tables have exactly one writer.
//!
//! # Key types
//!
//! - [`TickCore`] — the synchronous four-phase engine
//! - [`SchedulerHandle`] / [`spawn_scheduler`] — the actor that drives it
//! - [`TickConfig`] — tick interval, action timeout, reveal delay
//! - [`ParticipantDirectory`], [`EventSink`], [`ActionRules`] — the
//!   narrow collaborator interfaces injected at construction

mod config;
mod core;
mod error;
mod hooks;
mod scheduler;

pub use config::TickConfig;
pub use self::core::TickCore;
pub use error::{SchedulerError, SubmitError};
pub use hooks::{ActionOutcome, ActionRules, EventSink, ParticipantDirectory};
pub use scheduler::{spawn_scheduler, SchedulerHandle, SchedulerInfo};
