// src/timing/debounce.rs

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::errors::{IdleschedError, Result};

/// Debounced callback.
///
/// Each [`Debounced::call`] restarts the timer; `func` runs with the last
/// argument once `wait` passes without another call.
pub struct Debounced<A> {
    func: Arc<dyn Fn(A) + Send + Sync + 'static>,
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    runtime: Handle,
}

impl<A> fmt::Debug for Debounced<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Wrap `func`. Must be called inside a Tokio runtime.
    pub fn new<F>(func: F, wait: Duration) -> Result<Self>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        let runtime =
            Handle::try_current().map_err(|e| IdleschedError::NoRuntime(e.to_string()))?;
        Ok(Self {
            func: Arc::new(func),
            wait,
            pending: Mutex::new(None),
            runtime,
        })
    }

    pub fn call(&self, arg: A) {
        let func = Arc::clone(&self.func);
        let wait = self.wait;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
            trace!("debounce timer restarted");
        }
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(wait).await;
            func(arg);
        }));
    }
}

impl<A> Debounced<A> {
    /// Drop a pending call, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    /// Whether a call is waiting for its timer.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<A> Drop for Debounced<A> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}
