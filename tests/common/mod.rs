#![allow(dead_code)]

use std::sync::Arc;

use idlesched::Scheduler;
use idlesched::engine::{IdleHost, NoIdleHost, SchedulerOptions};

pub use idlesched_test_utils::builders::{ConfigFileBuilder, fallback_options};
pub use idlesched_test_utils::fake_host::CountingIdleHost;
pub use idlesched_test_utils::recorder::CallLog;
pub use idlesched_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Scheduler in idle mode whose slices each fit `tasks_per_slice` tasks.
pub fn counting_scheduler(tasks_per_slice: usize) -> (Scheduler, Arc<std::sync::atomic::AtomicUsize>) {
    let host = CountingIdleHost::new(tasks_per_slice);
    let slices = host.slices();
    let host: Arc<dyn IdleHost> = Arc::new(host);
    let scheduler =
        Scheduler::new(SchedulerOptions::default(), host).expect("scheduler inside a runtime");
    (scheduler, slices)
}

/// Scheduler on a host without an idle primitive.
pub fn fallback_scheduler(batch_size: usize) -> Scheduler {
    Scheduler::new(fallback_options(batch_size), Arc::new(NoIdleHost))
        .expect("scheduler inside a runtime")
}
