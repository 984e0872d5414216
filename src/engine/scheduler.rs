// src/engine/scheduler.rs

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::ConfigFile;
use crate::engine::core::{DrainCore, PassEnd};
use crate::engine::idle::{IdleHost, PassBudget, TokioIdleHost};
use crate::engine::{DrainState, SchedulerOptions, SchedulerStats};
use crate::errors::{IdleschedError, Result};
use crate::queue::{TaskId, TaskOptions};
use crate::types::{DrainMode, Priority};

/// Handle to a deferred task scheduler.
///
/// Cloning is cheap; all clones share one queue and at most one drain loop.
/// The drain loop is a Tokio task spawned on the runtime the scheduler was
/// created in. It runs one task at a time and yields back to the runtime
/// between passes, so tasks never run in parallel with each other.
///
/// Tasks run outside of the internal lock and may schedule further tasks
/// through a clone of the handle. They must not await [`Scheduler::wait_idle`]
/// on their own scheduler.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

struct Inner {
    core: Mutex<DrainCore>,
    host: Arc<dyn IdleHost>,
    /// Effective mode after checking the host.
    mode: DrainMode,
    options: SchedulerOptions,
    state_tx: watch::Sender<DrainState>,
    runtime: Handle,
}

impl Inner {
    fn lock_core(&self) -> MutexGuard<'_, DrainCore> {
        // Tasks never run under this lock, so a poisoned core is still consistent.
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("mode", &self.inner.mode)
            .field("options", &self.inner.options)
            .field("state", &*self.inner.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    /// Create a scheduler on the current Tokio runtime.
    ///
    /// Fails with [`IdleschedError::InvalidArgument`] for options with a zero
    /// batch size, chunk size or deadline, and with
    /// [`IdleschedError::NoRuntime`] outside of a runtime.
    pub fn new(options: SchedulerOptions, host: Arc<dyn IdleHost>) -> Result<Self> {
        options.validate()?;
        let runtime =
            Handle::try_current().map_err(|e| IdleschedError::NoRuntime(e.to_string()))?;

        let mode = match options.mode {
            DrainMode::Idle if !host.supports_idle() => {
                info!("idle-time scheduling unavailable; using fixed-batch fallback");
                DrainMode::Fallback
            }
            other => other,
        };

        let (state_tx, _state_rx) = watch::channel(DrainState::Idle);

        debug!(?mode, ?options, "scheduler created");

        Ok(Self {
            inner: Arc::new(Inner {
                core: Mutex::new(DrainCore::new(options)),
                host,
                mode,
                options,
                state_tx,
                runtime,
            }),
        })
    }

    /// Create a scheduler from a validated [`ConfigFile`], using the tokio
    /// idle host with the configured slice and timeout.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let host = TokioIdleHost::new(cfg.scheduler.idle_slice, cfg.scheduler.idle_timeout);
        Self::new(SchedulerOptions::from_config(cfg), Arc::new(host))
    }

    /// Drain mode actually in use.
    pub fn mode(&self) -> DrainMode {
        self.inner.mode
    }

    pub fn options(&self) -> SchedulerOptions {
        self.inner.options
    }

    /// Schedule `work` for deferred execution.
    ///
    /// Invalid options are logged and the call is a no-op (`None`).
    pub fn schedule_task<F>(&self, work: F, options: TaskOptions) -> Option<TaskId>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        match self.try_schedule_task(work, options) {
            Ok(id) => Some(id),
            Err(err) => {
                error!(error = %err, "rejected background task; ignoring");
                None
            }
        }
    }

    /// Like [`Scheduler::schedule_task`], but returns the rejection.
    pub fn try_schedule_task<F>(&self, work: F, options: TaskOptions) -> Result<TaskId>
    where
        F: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        let step = {
            let mut core = self.inner.lock_core();
            let step = core.enqueue(Box::new(work), options)?;
            if step.start_drain {
                self.inner.state_tx.send_replace(DrainState::Draining);
            }
            step
        };

        if step.start_drain {
            self.inner.runtime.spawn(drain_loop(Arc::clone(&self.inner)));
        }

        Ok(step.id)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock_core().is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock_core().len()
    }

    pub fn state(&self) -> DrainState {
        self.inner.lock_core().state()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.inner.lock_core().stats()
    }

    /// Pending `(id, priority)` pairs in queue order. The order reflects the
    /// last pass sort plus any tasks appended since.
    pub fn pending(&self) -> Vec<(TaskId, Priority)> {
        self.inner.lock_core().pending()
    }

    /// Resolve once the scheduler is `Idle` (immediately if it already is).
    pub async fn wait_idle(&self) -> Result<()> {
        let mut rx = self.inner.state_tx.subscribe();
        rx.wait_for(|state| *state == DrainState::Idle)
            .await
            .map_err(|_| IdleschedError::Closed)?;
        Ok(())
    }
}

/// The single drain loop. Started on the `Idle -> Draining` transition and
/// returns after publishing `Idle`.
async fn drain_loop(inner: Arc<Inner>) {
    debug!(mode = ?inner.mode, "drain loop started");

    loop {
        let mut budget = match inner.mode {
            DrainMode::Idle => PassBudget::idle(inner.host.request_idle().await),
            DrainMode::Fallback => {
                tokio::task::yield_now().await;
                PassBudget::batch(inner.options.fallback_batch_size)
            }
        };

        {
            let mut core = inner.lock_core();
            if !core.begin_pass() {
                inner.state_tx.send_replace(DrainState::Idle);
                break;
            }
        }

        while budget.has_room() {
            let Some(task) = inner.lock_core().next_task() else {
                break;
            };
            debug!(id = %task.id(), priority = %task.priority(), "executing background task");
            let report = task.run();
            budget.task_finished();
            inner.lock_core().record(&report);
        }

        let mut core = inner.lock_core();
        if core.finish_pass() == PassEnd::Idle {
            inner.state_tx.send_replace(DrainState::Idle);
            break;
        }
    }

    debug!("drain loop stopped");
}
