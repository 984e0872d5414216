// tests/error_handling.rs

mod common;
use crate::common::{CallLog, TestResult, fallback_scheduler, init_tracing, with_timeout};

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use idlesched::config::load_and_validate;
use idlesched::engine::{NoIdleHost, SchedulerOptions, TokioIdleHost};
use idlesched::errors::IdleschedError;
use idlesched::{DrainMode, Scheduler, TaskOptions};
use tempfile::tempdir;

fn load_str(contents: &str) -> Result<(), IdleschedError> {
    let dir = tempdir().map_err(IdleschedError::IoError)?;
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).map_err(IdleschedError::IoError)?;
    load_and_validate(&path).map(|_| ())
}

#[test]
fn zero_batch_size_is_a_config_error() {
    let err = load_str("[scheduler]\nfallback_batch_size = 0\n").unwrap_err();
    assert!(matches!(err, IdleschedError::ConfigError(_)), "got {err:?}");
}

#[test]
fn unknown_mode_is_a_config_error() {
    let err = load_str("[scheduler]\nmode = \"eager\"\n").unwrap_err();
    assert!(matches!(err, IdleschedError::ConfigError(_)), "got {err:?}");
}

#[test]
fn zero_chunk_size_and_zero_timeout_are_config_errors() {
    let err = load_str("[chunks]\ndefault_chunk_size = 0\n").unwrap_err();
    assert!(matches!(err, IdleschedError::ConfigError(_)), "got {err:?}");

    let err = load_str("[scheduler]\nidle_timeout_ms = 0\n").unwrap_err();
    assert!(matches!(err, IdleschedError::ConfigError(_)), "got {err:?}");
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let err = load_str("[scheduler\nmode = ").unwrap_err();
    assert!(matches!(err, IdleschedError::TomlError(_)), "got {err:?}");
}

#[test]
fn scheduler_outside_runtime_is_rejected() {
    let err = Scheduler::new(SchedulerOptions::default(), Arc::new(NoIdleHost)).unwrap_err();
    assert!(matches!(err, IdleschedError::NoRuntime(_)), "got {err:?}");
}

#[tokio::test]
async fn zero_deadline_is_rejected_and_counted() -> TestResult {
    init_tracing();
    let scheduler = fallback_scheduler(3);
    let log = CallLog::new();

    let err = scheduler
        .try_schedule_task(log.task("strict"), TaskOptions::normal().deadline(Duration::ZERO))
        .unwrap_err();
    assert!(matches!(err, IdleschedError::InvalidArgument(_)), "got {err:?}");

    let id = scheduler.schedule_task(log.task("lenient"), TaskOptions::low().deadline(Duration::ZERO));
    assert!(id.is_none());

    assert!(scheduler.is_empty());
    assert_eq!(scheduler.state(), idlesched::DrainState::Idle);

    let stats = scheduler.stats();
    assert_eq!(stats.rejected, 2);
    assert_eq!(stats.enqueued, 0);

    with_timeout(scheduler.wait_idle()).await?;
    assert_eq!(log.len(), 0);
    Ok(())
}

#[tokio::test]
async fn rejected_task_does_not_disturb_valid_ones() -> TestResult {
    init_tracing();
    let scheduler = fallback_scheduler(3);
    let log = CallLog::new();

    scheduler.schedule_task(log.task("a"), TaskOptions::normal());
    scheduler.schedule_task(log.task("bad"), TaskOptions::high().deadline(Duration::ZERO));
    scheduler.schedule_task(log.task("b"), TaskOptions::normal());

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["a", "b"]);
    Ok(())
}

#[test]
fn unparseable_priority_is_rejected() {
    let err = TaskOptions::parse(Some("urgent"), None).unwrap_err();
    assert!(err.contains("urgent"), "got {err}");

    let err = TaskOptions::parse(Some("high"), Some(0)).unwrap_err();
    assert!(!err.is_empty());

    let ok = TaskOptions::parse(Some("LOW"), Some(10)).unwrap();
    assert_eq!(ok.priority, idlesched::Priority::Low);
    assert_eq!(ok.deadline, Some(Duration::from_millis(10)));
}

#[tokio::test]
async fn options_that_cannot_drain_are_rejected() {
    let cases = [
        SchedulerOptions {
            fallback_batch_size: 0,
            ..SchedulerOptions::default()
        },
        SchedulerOptions {
            default_chunk_size: 0,
            ..SchedulerOptions::default()
        },
        SchedulerOptions {
            default_deadline: Duration::ZERO,
            ..SchedulerOptions::default()
        },
    ];

    for options in cases {
        let err = Scheduler::new(options, Arc::new(NoIdleHost)).unwrap_err();
        assert!(
            matches!(err, IdleschedError::InvalidArgument(_)),
            "{options:?} gave {err:?}"
        );
    }
}

#[tokio::test]
async fn zero_idle_slice_still_drains_one_task_per_pass() -> TestResult {
    init_tracing();
    let options = SchedulerOptions {
        mode: DrainMode::Idle,
        ..SchedulerOptions::default()
    };
    let host = TokioIdleHost::new(Duration::ZERO, None);
    let scheduler = Scheduler::new(options, Arc::new(host))?;
    let log = CallLog::new();

    for name in ["a", "b", "c"] {
        scheduler.schedule_task(log.task(name), TaskOptions::default());
    }
    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["a", "b", "c"]);
    let stats = scheduler.stats();
    assert_eq!(stats.executed, 3);
    assert_eq!(stats.passes, 3);
    Ok(())
}
