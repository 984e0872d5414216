// src/timing/throttle.rs

use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Throttled callback: runs immediately, then ignores calls until `limit`
/// has passed since the last run.
pub struct Throttled<A> {
    func: Box<dyn Fn(A) + Send + Sync + 'static>,
    limit: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl<A> fmt::Debug for Throttled<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}

impl<A> Throttled<A> {
    pub fn new<F>(func: F, limit: Duration) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
            limit,
            last_fired: Mutex::new(None),
        }
    }

    /// Invoke `func(arg)` unless throttled. Returns whether it ran.
    pub fn call(&self, arg: A) -> bool {
        let now = Instant::now();
        {
            let mut last = self.last_fired.lock().unwrap_or_else(PoisonError::into_inner);
            if last.is_some_and(|at| now.duration_since(at) < self.limit) {
                return false;
            }
            *last = Some(now);
        }
        (self.func)(arg);
        true
    }
}
