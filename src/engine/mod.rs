// src/engine/mod.rs

//! Deferred task scheduling engine.
//!
//! This module ties together:
//! - the task queue (what is pending, in which order)
//! - the idle host (when the runtime has time to spare)
//! - the drain loop that pops and runs tasks pass by pass
//!
//! The pure state machine lives in [`core`]; the async shell that owns the
//! drain loop is implemented in [`scheduler`]. The idle-time primitive is
//! abstracted in [`idle`].

use std::time::Duration;

use crate::config::ConfigFile;
use crate::errors::{IdleschedError, Result};
use crate::queue::DEFAULT_DEADLINE;
use crate::types::DrainMode;

/// Whether a drain loop is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Idle,
    Draining,
}

/// Options shared by the core and the async shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    /// Requested drain mode. `Idle` degrades to `Fallback` when the host
    /// has no idle primitive.
    pub mode: DrainMode,
    /// Tasks per pass in fallback mode.
    pub fallback_batch_size: usize,
    /// Deadline budget for tasks that don't carry their own.
    pub default_deadline: Duration,
    /// Slice size used by the chunked processor when none is given.
    pub default_chunk_size: usize,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            mode: DrainMode::Idle,
            fallback_batch_size: 3,
            default_deadline: DEFAULT_DEADLINE,
            default_chunk_size: 100,
        }
    }
}

impl SchedulerOptions {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            mode: cfg.scheduler.mode,
            fallback_batch_size: cfg.scheduler.fallback_batch_size,
            default_deadline: cfg.scheduler.default_deadline,
            default_chunk_size: cfg.chunks.default_chunk_size,
        }
    }

    /// Reject options the drain loop cannot make progress with.
    pub fn validate(&self) -> Result<()> {
        if self.fallback_batch_size == 0 {
            return Err(IdleschedError::InvalidArgument(
                "fallback_batch_size must be at least 1".to_string(),
            ));
        }
        if self.default_chunk_size == 0 {
            return Err(IdleschedError::InvalidArgument(
                "default_chunk_size must be at least 1".to_string(),
            ));
        }
        if self.default_deadline.is_zero() {
            return Err(IdleschedError::InvalidArgument(
                "default_deadline must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Running counters, mostly for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub enqueued: u64,
    /// Enqueue attempts refused because of invalid options.
    pub rejected: u64,
    pub executed: u64,
    /// Executed tasks whose work returned an error or panicked.
    pub failed: u64,
    /// Drain passes started.
    pub passes: u64,
}

pub mod core;
pub mod idle;
pub mod scheduler;

pub use self::core::{DrainCore, EnqueueStep, PassEnd};
pub use idle::{IdleDeadline, IdleHost, NoIdleHost, PassBudget, SliceDeadline, TokioIdleHost};
pub use scheduler::Scheduler;
