// src/engine/core.rs

//! Pure drain state machine.
//!
//! [`DrainCore`] owns the task queue, the `Idle`/`Draining` flag and the
//! counters. It is synchronous and deterministic: it never spawns, sleeps or
//! awaits. The async shell (`engine::scheduler::Scheduler`) is responsible
//! for:
//! - waiting for idle slices or yielding between fallback batches
//! - running popped tasks outside of any lock, so tasks can enqueue more work
//! - publishing state changes to waiters
//!
//! Because every step is explicit, the core can be unit tested without Tokio.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::engine::idle::PassBudget;
use crate::engine::{DrainState, SchedulerOptions, SchedulerStats};
use crate::errors::{IdleschedError, Result};
use crate::queue::{Task, TaskId, TaskOptions, TaskOutcome, TaskQueue, TaskReport, Work};
use crate::types::Priority;

/// Result of a successful enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnqueueStep {
    pub id: TaskId,
    /// True if this enqueue moved the core from `Idle` to `Draining`; the
    /// shell must start exactly one drain loop in that case.
    pub start_drain: bool,
}

/// What the shell should do after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassEnd {
    /// Tasks remain; request another pass.
    Continue,
    /// Queue is empty; the core is back in `Idle`.
    Idle,
}

#[derive(Debug)]
pub struct DrainCore {
    queue: TaskQueue,
    state: DrainState,
    options: SchedulerOptions,
    stats: SchedulerStats,
}

impl DrainCore {
    pub fn new(options: SchedulerOptions) -> Self {
        Self {
            queue: TaskQueue::new(),
            state: DrainState::Idle,
            options,
            stats: SchedulerStats::default(),
        }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    pub fn state(&self) -> DrainState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == DrainState::Idle
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Pending `(id, priority)` pairs in current queue order.
    pub fn pending(&self) -> Vec<(TaskId, Priority)> {
        self.queue.pending()
    }

    /// Append a task.
    ///
    /// Rejects options with a zero deadline budget; nothing is queued in that
    /// case and the state is unchanged.
    pub fn enqueue(&mut self, work: Work, options: TaskOptions) -> Result<EnqueueStep> {
        if options.deadline == Some(Duration::ZERO) {
            self.stats.rejected += 1;
            return Err(IdleschedError::InvalidArgument(
                "task deadline budget must be greater than zero".to_string(),
            ));
        }

        let options = TaskOptions {
            deadline: Some(options.deadline.unwrap_or(self.options.default_deadline)),
            ..options
        };
        let id = self.queue.push(work, options);
        self.stats.enqueued += 1;

        let start_drain = self.state == DrainState::Idle;
        if start_drain {
            self.state = DrainState::Draining;
            debug!(%id, "first task while idle; drain loop should start");
        }

        Ok(EnqueueStep { id, start_drain })
    }

    /// Start a drain pass: reorder the queue by priority.
    ///
    /// Returns `false` (and goes back to `Idle`) if nothing is pending.
    pub fn begin_pass(&mut self) -> bool {
        if self.queue.is_empty() {
            self.state = DrainState::Idle;
            return false;
        }

        self.queue.sort_for_pass();
        self.stats.passes += 1;
        debug!(
            pass = self.stats.passes,
            pending = self.queue.len(),
            "starting drain pass"
        );
        true
    }

    /// Pop the next task of the current pass.
    pub fn next_task(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Account for an executed task and log its outcome.
    pub fn record(&mut self, report: &TaskReport) {
        self.stats.executed += 1;
        let label = report.label.as_deref().unwrap_or("-");

        match &report.outcome {
            TaskOutcome::Success => {
                debug!(
                    id = %report.id,
                    priority = %report.priority,
                    label,
                    elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                    "background task completed"
                );
            }
            TaskOutcome::Failed(message) => {
                self.stats.failed += 1;
                error!(
                    id = %report.id,
                    priority = %report.priority,
                    label,
                    error = %message,
                    "error in background task; dropping it and continuing"
                );
            }
        }

        if report.overran_deadline() {
            warn!(
                id = %report.id,
                label,
                elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
                deadline_ms = report.deadline.as_secs_f64() * 1000.0,
                "background task overran its deadline budget"
            );
        }
    }

    /// Finish a pass, going back to `Idle` if the queue is empty.
    pub fn finish_pass(&mut self) -> PassEnd {
        if self.queue.is_empty() {
            self.state = DrainState::Idle;
            info!(
                executed = self.stats.executed,
                failed = self.stats.failed,
                passes = self.stats.passes,
                "task queue drained"
            );
            PassEnd::Idle
        } else {
            debug!(remaining = self.queue.len(), "pass ended with tasks pending");
            PassEnd::Continue
        }
    }

    /// Run one complete pass in place.
    ///
    /// Tasks run while the core is mutably borrowed, so they cannot enqueue
    /// into this core. The async shell uses the individual steps instead.
    pub fn run_pass(&mut self, budget: &mut PassBudget) -> PassEnd {
        if !self.begin_pass() {
            return PassEnd::Idle;
        }

        while budget.has_room() {
            let Some(task) = self.next_task() else {
                break;
            };
            let report = task.run();
            budget.task_finished();
            self.record(&report);
        }

        self.finish_pass()
    }
}
