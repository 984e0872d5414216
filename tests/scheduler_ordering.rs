// tests/scheduler_ordering.rs

mod common;
use crate::common::{CallLog, TestResult, counting_scheduler, init_tracing, with_timeout};

use std::collections::HashSet;
use std::sync::atomic::Ordering;

use idlesched::{DrainState, TaskOptions};

#[tokio::test]
async fn drain_order_is_priority_then_enqueue_order() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(100);
    let log = CallLog::new();

    scheduler.schedule_task(log.task("low"), TaskOptions::low());
    scheduler.schedule_task(log.task("high-1"), TaskOptions::high());
    scheduler.schedule_task(log.task("normal"), TaskOptions::normal());
    scheduler.schedule_task(log.task("high-2"), TaskOptions::high());

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["high-1", "high-2", "normal", "low"]);
    Ok(())
}

#[tokio::test]
async fn is_empty_before_enqueue_and_after_drain() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(100);
    let log = CallLog::new();

    assert!(scheduler.is_empty());
    assert_eq!(scheduler.state(), DrainState::Idle);

    scheduler.schedule_task(log.task("a"), TaskOptions::default());
    assert!(!scheduler.is_empty());
    assert_eq!(scheduler.state(), DrainState::Draining);

    with_timeout(scheduler.wait_idle()).await?;

    assert!(scheduler.is_empty());
    assert_eq!(scheduler.len(), 0);
    assert_eq!(scheduler.state(), DrainState::Idle);
    Ok(())
}

#[tokio::test]
async fn failing_task_does_not_block_later_tasks() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(100);
    let log = CallLog::new();

    scheduler.schedule_task(
        || anyhow::bail!("could not reach tile server"),
        TaskOptions::default().label("A"),
    );
    scheduler.schedule_task(log.task("B"), TaskOptions::default());

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["B"]);
    let stats = scheduler.stats();
    assert_eq!(stats.executed, 2);
    assert_eq!(stats.failed, 1);
    Ok(())
}

#[tokio::test]
async fn panicking_task_is_isolated() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(100);
    let log = CallLog::new();

    scheduler.schedule_task(|| panic!("card markup missing"), TaskOptions::high());
    scheduler.schedule_task(log.task("after"), TaskOptions::low());

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["after"]);
    assert_eq!(scheduler.stats().failed, 1);
    Ok(())
}

#[tokio::test]
async fn each_slice_runs_only_what_fits() -> TestResult {
    init_tracing();
    let (scheduler, slices) = counting_scheduler(2);
    let log = CallLog::new();

    for name in ["1", "2", "3", "4", "5"] {
        scheduler.schedule_task(log.task(name), TaskOptions::default());
    }

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.len(), 5);
    assert_eq!(slices.load(Ordering::SeqCst), 3);
    assert_eq!(scheduler.stats().passes, 3);
    Ok(())
}

#[tokio::test]
async fn higher_priority_enqueued_mid_pass_runs_first_next_pass() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(1);
    let log = CallLog::new();

    {
        let inner = scheduler.clone();
        let log = log.clone();
        scheduler.schedule_task(
            move || {
                log.push("A");
                inner.schedule_task(log.task("C"), TaskOptions::high());
                Ok(())
            },
            TaskOptions::normal(),
        );
    }
    scheduler.schedule_task(log.task("B"), TaskOptions::low());

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["A", "C", "B"]);
    Ok(())
}

#[tokio::test]
async fn reentrant_enqueue_is_picked_up_in_the_same_pass() -> TestResult {
    init_tracing();
    let (scheduler, slices) = counting_scheduler(100);
    let log = CallLog::new();

    {
        let inner = scheduler.clone();
        let log = log.clone();
        scheduler.schedule_task(
            move || {
                log.push("outer");
                inner.schedule_task(log.task("inner"), TaskOptions::low());
                Ok(())
            },
            TaskOptions::default(),
        );
    }

    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["outer", "inner"]);
    assert_eq!(slices.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn wait_idle_returns_immediately_when_nothing_queued() -> TestResult {
    let (scheduler, slices) = counting_scheduler(1);
    with_timeout(scheduler.wait_idle()).await?;
    assert_eq!(slices.load(Ordering::SeqCst), 0);
    Ok(())
}

#[tokio::test]
async fn scheduler_is_reusable_after_going_idle() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(100);
    let log = CallLog::new();

    scheduler.schedule_task(log.task("first"), TaskOptions::default());
    with_timeout(scheduler.wait_idle()).await?;

    scheduler.schedule_task(log.task("second"), TaskOptions::default());
    with_timeout(scheduler.wait_idle()).await?;

    assert_eq!(log.entries(), vec!["first", "second"]);
    assert_eq!(scheduler.stats().passes, 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_producers_each_task_runs_exactly_once() -> TestResult {
    init_tracing();
    let (scheduler, _) = counting_scheduler(8);
    let log = CallLog::new();

    let mut producers = Vec::new();
    for p in 0..4 {
        let scheduler = scheduler.clone();
        let log = log.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..25 {
                scheduler.schedule_task(log.task(&format!("{p}-{i}")), TaskOptions::default());
                tokio::task::yield_now().await;
            }
        }));
    }
    for producer in producers {
        producer.await?;
    }

    with_timeout(scheduler.wait_idle()).await?;

    let entries = log.entries();
    let unique: HashSet<&String> = entries.iter().collect();
    assert_eq!(entries.len(), 100);
    assert_eq!(unique.len(), 100);
    assert_eq!(scheduler.stats().executed, 100);
    Ok(())
}
