// src/engine/idle.rs

//! Idle-time primitive abstraction.
//!
//! The scheduler asks an [`IdleHost`] for an idle slice before each drain
//! pass. The slice comes back as an [`IdleDeadline`] which the drain loop
//! polls between tasks. Hosts without an idle primitive report
//! `supports_idle() == false` and the scheduler switches to fixed-size
//! batches instead.
//!
//! - `TokioIdleHost` is the production host: a cooperative yield followed by
//!   a fixed time slice.
//! - Tests can provide their own host, for example one that hands out a
//!   fixed number of tasks per slice.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::Instant;

/// Time budget of a single idle slice.
pub trait IdleDeadline: Send + fmt::Debug {
    /// Time left in this slice. Zero once the slice is used up.
    fn time_remaining(&self) -> Duration;

    /// True if the host granted this slice only after its timeout expired;
    /// the pass then runs regardless of the remaining time.
    fn did_timeout(&self) -> bool;

    /// Called by the drain loop after each task in the slice.
    fn task_finished(&mut self) {}
}

/// Host-provided mechanism for running code only when the runtime has time
/// to spare.
pub trait IdleHost: Send + Sync {
    /// Whether this host has an idle primitive at all.
    fn supports_idle(&self) -> bool {
        true
    }

    /// Wait for the next idle slice.
    fn request_idle(&self) -> Pin<Box<dyn Future<Output = Box<dyn IdleDeadline>> + Send + '_>>;
}

/// Deadline measured against the tokio clock.
#[derive(Debug, Clone, Copy)]
pub struct SliceDeadline {
    granted_at: Instant,
    slice: Duration,
    did_timeout: bool,
}

impl SliceDeadline {
    pub fn start(slice: Duration, did_timeout: bool) -> Self {
        Self {
            granted_at: Instant::now(),
            slice,
            did_timeout,
        }
    }
}

impl IdleDeadline for SliceDeadline {
    fn time_remaining(&self) -> Duration {
        self.slice.saturating_sub(self.granted_at.elapsed())
    }

    fn did_timeout(&self) -> bool {
        self.did_timeout
    }
}

/// Idle host for a tokio runtime.
///
/// "Idle" means: every other ready task on this runtime got a chance to run
/// (`yield_now`). The slice then lasts `slice`. If `timeout` is set and the
/// yield took longer than that, the slice is flagged as timed out.
#[derive(Debug, Clone, Copy)]
pub struct TokioIdleHost {
    slice: Duration,
    timeout: Option<Duration>,
}

impl TokioIdleHost {
    pub fn new(slice: Duration, timeout: Option<Duration>) -> Self {
        Self { slice, timeout }
    }
}

impl Default for TokioIdleHost {
    fn default() -> Self {
        Self::new(Duration::from_millis(16), None)
    }
}

impl IdleHost for TokioIdleHost {
    fn request_idle(&self) -> Pin<Box<dyn Future<Output = Box<dyn IdleDeadline>> + Send + '_>> {
        Box::pin(async move {
            let requested_at = Instant::now();
            tokio::task::yield_now().await;
            let did_timeout = self
                .timeout
                .is_some_and(|timeout| requested_at.elapsed() >= timeout);
            Box::new(SliceDeadline::start(self.slice, did_timeout)) as Box<dyn IdleDeadline>
        })
    }
}

/// Host without an idle primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdleHost;

impl IdleHost for NoIdleHost {
    fn supports_idle(&self) -> bool {
        false
    }

    fn request_idle(&self) -> Pin<Box<dyn Future<Output = Box<dyn IdleDeadline>> + Send + '_>> {
        // Never consulted by the scheduler; an already-expired slice.
        Box::pin(async { Box::new(SliceDeadline::start(Duration::ZERO, false)) as Box<dyn IdleDeadline> })
    }
}

/// How much work a single drain pass may start.
#[derive(Debug)]
pub enum PassBudget {
    /// Run while the idle slice has time left (or timed out). The first
    /// task of a pass always starts, so an exhausted slice still makes
    /// progress.
    Idle {
        deadline: Box<dyn IdleDeadline>,
        started: usize,
    },
    /// Run at most `remaining` more tasks.
    Batch { remaining: usize },
}

impl PassBudget {
    pub fn idle(deadline: Box<dyn IdleDeadline>) -> Self {
        PassBudget::Idle {
            deadline,
            started: 0,
        }
    }

    pub fn batch(size: usize) -> Self {
        PassBudget::Batch { remaining: size }
    }

    /// Whether another task may be started in this pass.
    pub fn has_room(&self) -> bool {
        match self {
            PassBudget::Idle { deadline, started } => {
                *started == 0
                    || deadline.time_remaining() > Duration::ZERO
                    || deadline.did_timeout()
            }
            PassBudget::Batch { remaining } => *remaining > 0,
        }
    }

    pub fn task_finished(&mut self) {
        match self {
            PassBudget::Idle { deadline, started } => {
                *started += 1;
                deadline.task_finished();
            }
            PassBudget::Batch { remaining } => *remaining = remaining.saturating_sub(1),
        }
    }
}
