use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use idlesched::engine::{IdleDeadline, IdleHost};

/// An idle host whose slices fit a fixed number of tasks, independent of
/// the clock. Counts how many slices were handed out.
pub struct CountingIdleHost {
    tasks_per_slice: usize,
    slices: Arc<AtomicUsize>,
}

impl CountingIdleHost {
    pub fn new(tasks_per_slice: usize) -> Self {
        Self {
            tasks_per_slice,
            slices: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared counter of slices granted so far.
    pub fn slices(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.slices)
    }
}

#[derive(Debug)]
pub struct CountingDeadline {
    remaining: usize,
}

impl IdleDeadline for CountingDeadline {
    fn time_remaining(&self) -> Duration {
        if self.remaining > 0 {
            Duration::from_millis(1)
        } else {
            Duration::ZERO
        }
    }

    fn did_timeout(&self) -> bool {
        false
    }

    fn task_finished(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

impl IdleHost for CountingIdleHost {
    fn request_idle(&self) -> Pin<Box<dyn Future<Output = Box<dyn IdleDeadline>> + Send + '_>> {
        let slices = Arc::clone(&self.slices);
        let remaining = self.tasks_per_slice;

        Box::pin(async move {
            tokio::task::yield_now().await;
            slices.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingDeadline { remaining }) as Box<dyn IdleDeadline>
        })
    }
}
