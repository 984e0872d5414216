// src/queue/task.rs

//! A single deferred unit of work.

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::types::Priority;

/// Default deadline budget for a task.
pub const DEFAULT_DEADLINE: Duration = Duration::from_millis(50);

/// Boxed work unit. Returning `Err` marks the task as failed.
pub type Work = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// Identifier of an enqueued task.
///
/// Identifiers are handed out in enqueue order, so comparing two ids tells
/// which task was enqueued first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Per-task scheduling options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOptions {
    pub priority: Priority,
    /// Time budget the task is expected to fit in. Not enforced; overruns
    /// are logged. `None` uses the scheduler's default budget.
    pub deadline: Option<Duration>,
    /// Optional human-readable name used in logs.
    pub label: Option<String>,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            priority: Priority::Normal,
            deadline: None,
            label: None,
        }
    }
}

impl TaskOptions {
    pub fn with_priority(priority: Priority) -> Self {
        Self {
            priority,
            ..Self::default()
        }
    }

    pub fn high() -> Self {
        Self::with_priority(Priority::High)
    }

    pub fn normal() -> Self {
        Self::with_priority(Priority::Normal)
    }

    pub fn low() -> Self {
        Self::with_priority(Priority::Low)
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build options from loosely-typed input, e.g. values coming from a
    /// config file or another language boundary.
    ///
    /// Missing values fall back to the defaults.
    pub fn parse(priority: Option<&str>, deadline_ms: Option<u64>) -> Result<Self, String> {
        let priority = match priority {
            Some(p) => p.parse::<Priority>()?,
            None => Priority::default(),
        };
        let deadline = match deadline_ms {
            Some(0) => return Err("deadline must be greater than 0ms".to_string()),
            Some(ms) => Some(Duration::from_millis(ms)),
            None => None,
        };
        Ok(Self {
            priority,
            deadline,
            label: None,
        })
    }
}

/// Result of running a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    /// The work returned an error or panicked; the message is kept for logs.
    Failed(String),
}

/// What happened when a task was executed.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub id: TaskId,
    pub priority: Priority,
    pub label: Option<String>,
    pub deadline: Duration,
    pub elapsed: Duration,
    pub outcome: TaskOutcome,
}

impl TaskReport {
    pub fn overran_deadline(&self) -> bool {
        self.elapsed > self.deadline
    }
}

/// A pending unit of work with its scheduling metadata.
///
/// Immutable once created; consumed by [`Task::run`].
pub struct Task {
    id: TaskId,
    priority: Priority,
    deadline: Duration,
    label: Option<String>,
    work: Work,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("deadline", &self.deadline)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Task {
    pub(crate) fn new(id: TaskId, work: Work, options: TaskOptions) -> Self {
        Self {
            id,
            priority: options.priority,
            deadline: options.deadline.unwrap_or(DEFAULT_DEADLINE),
            label: options.label,
            work,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Execute the work synchronously.
    ///
    /// Both a returned error and a panic are captured in the report; neither
    /// escapes this call.
    pub fn run(self) -> TaskReport {
        let Task {
            id,
            priority,
            deadline,
            label,
            work,
        } = self;

        let started = Instant::now();
        let outcome = match catch_unwind(AssertUnwindSafe(work)) {
            Ok(Ok(())) => TaskOutcome::Success,
            Ok(Err(err)) => TaskOutcome::Failed(format!("{err:#}")),
            Err(payload) => TaskOutcome::Failed(panic_message(payload.as_ref())),
        };

        TaskReport {
            id,
            priority,
            label,
            deadline,
            elapsed: started.elapsed(),
            outcome,
        }
    }
}

/// Best-effort extraction of a panic payload's message.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(work: impl FnOnce() -> anyhow::Result<()> + Send + 'static) -> Task {
        Task::new(TaskId(1), Box::new(work), TaskOptions::default())
    }

    #[test]
    fn successful_work_reports_success() {
        let report = task(|| Ok(())).run();
        assert_eq!(report.outcome, TaskOutcome::Success);
        assert_eq!(report.priority, Priority::Normal);
    }

    #[test]
    fn returned_error_is_captured() {
        let report = task(|| Err(anyhow::anyhow!("tile fetch failed"))).run();
        match report.outcome {
            TaskOutcome::Failed(msg) => assert!(msg.contains("tile fetch failed")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn panic_is_captured() {
        let report = task(|| panic!("boom")).run();
        match report.outcome {
            TaskOutcome::Failed(msg) => assert!(msg.contains("boom")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn parse_options_defaults_and_rejects_zero_deadline() {
        let opts = TaskOptions::parse(None, None).unwrap();
        assert_eq!(opts, TaskOptions::default());

        let opts = TaskOptions::parse(Some("low"), Some(10)).unwrap();
        assert_eq!(opts.priority, Priority::Low);
        assert_eq!(opts.deadline, Some(Duration::from_millis(10)));

        assert!(TaskOptions::parse(Some("urgent"), None).is_err());
        assert!(TaskOptions::parse(None, Some(0)).is_err());
    }
}
