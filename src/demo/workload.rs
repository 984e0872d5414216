// src/demo/workload.rs

//! One end-to-end session of background work, as the UI would produce it.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::chunked::ChunkedProcessor;
use crate::config::ConfigFile;
use crate::demo::{
    Coordinate, Route, calculate_route_in_background, filter_by_category, mock_recommendations,
    rank_by_distance, sample_cards,
};
use crate::engine::{Scheduler, SchedulerStats};
use crate::queue::TaskOptions;
use crate::timing::{DEFAULT_DEBOUNCE_WAIT, DEFAULT_THROTTLE_LIMIT, Debounced, Throttled};

/// Where the simulated user is standing (Times Square).
const USER_POSITION: Coordinate = Coordinate::new(40.7580, -73.9855);

/// Simulated map-move events, all inside one throttle window.
const MAP_MOVES: usize = 5;

/// What a demo session produced.
#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    /// Filter that survived debouncing.
    pub filter: String,
    /// Names of the cards left after filtering.
    pub visible_cards: Vec<String>,
    /// Names of the three nearest places.
    pub nearby: Vec<String>,
    /// Card count per category, computed slice by slice.
    pub category_counts: BTreeMap<String, usize>,
    /// Number of slices the chunked processor ran.
    pub slices: usize,
    pub route: Option<Route>,
    /// Map-move events that got past the throttle.
    pub map_moves_handled: usize,
    pub stats: SchedulerStats,
}

/// Run the demo workload on `scheduler` and wait until everything drained.
pub async fn run_demo(scheduler: &Scheduler, cfg: &ConfigFile) -> Result<DemoReport> {
    let report = Arc::new(Mutex::new(DemoReport::default()));

    let filter = debounced_filter(&cfg.demo.filter).await?;
    info!(filter = %filter, "search input settled");
    {
        let report = Arc::clone(&report);
        let filter = filter.clone();
        scheduler.schedule_task(
            move || {
                let cards = mock_recommendations();
                let visible: Vec<String> = filter_by_category(&cards, &filter)
                    .into_iter()
                    .map(|card| card.name.clone())
                    .collect();
                let mut report = report.lock().map_err(|_| anyhow::anyhow!("report lock poisoned"))?;
                report.filter = filter;
                report.visible_cards = visible;
                Ok(())
            },
            TaskOptions::high().label("filter-cards"),
        );
    }

    let moves = {
        let scheduler = scheduler.clone();
        let report = Arc::clone(&report);
        Throttled::new(
            move |position: Coordinate| {
                let report = Arc::clone(&report);
                scheduler.schedule_task(
                    move || {
                        let cards = mock_recommendations();
                        let nearby: Vec<String> = rank_by_distance(&cards, &position)
                            .into_iter()
                            .take(3)
                            .map(|(_, card)| card.name.clone())
                            .collect();
                        let mut report =
                            report.lock().map_err(|_| anyhow::anyhow!("report lock poisoned"))?;
                        report.nearby = nearby;
                        report.map_moves_handled += 1;
                        Ok(())
                    },
                    TaskOptions::normal().label("rank-nearby"),
                );
            },
            DEFAULT_THROTTLE_LIMIT,
        )
    };
    for step in 0..MAP_MOVES {
        let nudge = step as f64 * 0.0005;
        moves.call(Coordinate::new(USER_POSITION.lat + nudge, USER_POSITION.lng));
    }

    let (chunks_done_tx, chunks_done_rx) = oneshot::channel::<()>();
    {
        let report = Arc::clone(&report);
        ChunkedProcessor::new(sample_cards(cfg.demo.items), move |chunk| {
            let mut report = report.lock().map_err(|_| anyhow::anyhow!("report lock poisoned"))?;
            for card in chunk {
                *report.category_counts.entry(card.category.clone()).or_insert(0) += 1;
            }
            report.slices += 1;
            Ok(())
        })
        .label("category-counts")
        .on_complete(move || {
            let _ = chunks_done_tx.send(());
        })
        .submit(scheduler)?;
    }

    {
        let report = Arc::clone(&report);
        let start = USER_POSITION;
        let end = Coordinate::new(40.7794, -73.9632);
        let via = vec![Coordinate::new(40.7614, -73.9776)];
        calculate_route_in_background(scheduler, start, end, via, move |route| {
            report.lock().unwrap_or_else(PoisonError::into_inner).route = Some(route);
        });
    }

    scheduler.schedule_task(
        || {
            debug!("no pending saved-place changes to sync");
            Ok(())
        },
        TaskOptions::low().label("sync-saved-places"),
    );

    scheduler.wait_idle().await?;
    chunks_done_rx
        .await
        .context("chunked processor finished without completing")?;

    let mut report = report
        .lock()
        .map_err(|_| anyhow::anyhow!("report lock poisoned"))?
        .clone();
    report.stats = scheduler.stats();
    Ok(report)
}

/// Feed the filter through a debouncer one keystroke at a time and return
/// what comes out the other end.
async fn debounced_filter(filter: &str) -> Result<String> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let debounced = Debounced::new(
        move |value: String| {
            let _ = tx.send(value);
        },
        DEFAULT_DEBOUNCE_WAIT,
    )?;

    let mut typed = String::new();
    for ch in filter.chars() {
        typed.push(ch);
        debounced.call(typed.clone());
    }
    if typed.is_empty() {
        debounced.call(typed);
    }

    rx.recv().await.context("debounced filter was never delivered")
}
