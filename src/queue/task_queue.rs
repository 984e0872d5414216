// src/queue/task_queue.rs

use std::collections::VecDeque;

use tracing::trace;

use crate::queue::task::{Task, TaskId, TaskOptions, Work};
use crate::types::Priority;

/// Pending tasks in execution order.
///
/// New tasks are appended at the back. [`TaskQueue::sort_for_pass`] puts the
/// queue in drain order: priority descending, enqueue order within a tier.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
    next_id: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Append a task and return its id.
    pub fn push(&mut self, work: Work, options: TaskOptions) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        trace!(%id, priority = %options.priority, "task appended to queue");
        self.tasks.push_back(Task::new(id, work, options));
        id
    }

    /// Reorder pending tasks for the next drain pass.
    ///
    /// Ids are allocated in enqueue order, so the id is the tie-breaker
    /// within a priority tier.
    pub fn sort_for_pass(&mut self) {
        self.tasks
            .make_contiguous()
            .sort_by(|a, b| b.priority().cmp(&a.priority()).then(a.id().cmp(&b.id())));
    }

    pub fn pop_front(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    /// Snapshot of pending `(id, priority)` pairs in current queue order.
    pub fn pending(&self) -> Vec<(TaskId, Priority)> {
        self.tasks.iter().map(|t| (t.id(), t.priority())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Work {
        Box::new(|| -> anyhow::Result<()> { Ok(()) })
    }

    #[test]
    fn new_queue_is_empty() {
        let q = TaskQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.len(), 0);
    }

    #[test]
    fn ids_follow_enqueue_order() {
        let mut q = TaskQueue::new();
        let a = q.push(noop(), TaskOptions::low());
        let b = q.push(noop(), TaskOptions::high());
        assert!(a < b);
    }

    #[test]
    fn sort_is_priority_descending_and_stable() {
        let mut q = TaskQueue::new();
        let l = q.push(noop(), TaskOptions::low());
        let h1 = q.push(noop(), TaskOptions::high());
        let n = q.push(noop(), TaskOptions::normal());
        let h2 = q.push(noop(), TaskOptions::high());

        q.sort_for_pass();

        let order: Vec<TaskId> = q.pending().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![h1, h2, n, l]);
    }

    #[test]
    fn resort_after_late_push_keeps_fifo_within_tier() {
        let mut q = TaskQueue::new();
        let n1 = q.push(noop(), TaskOptions::normal());
        let l1 = q.push(noop(), TaskOptions::low());
        q.sort_for_pass();

        let n2 = q.push(noop(), TaskOptions::normal());
        let h = q.push(noop(), TaskOptions::high());
        q.sort_for_pass();

        let order: Vec<TaskId> = q.pending().into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![h, n1, n2, l1]);
    }
}
