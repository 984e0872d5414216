// src/queue/mod.rs

//! Pending work and its ordering.
//!
//! - [`task`] defines a single deferred unit of work plus its metadata and
//!   how it is executed in isolation.
//! - [`task_queue`] holds pending tasks and reorders them before each drain
//!   pass.

pub mod task;
pub mod task_queue;

pub use task::{Task, TaskId, TaskOptions, TaskOutcome, TaskReport, Work, DEFAULT_DEADLINE};
pub use task_queue::TaskQueue;
