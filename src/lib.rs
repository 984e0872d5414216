// src/lib.rs

pub mod chunked;
pub mod cli;
pub mod config;
pub mod demo;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod queue;
pub mod timing;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_or_default;
use crate::demo::{DemoReport, run_demo};

pub use crate::chunked::{ChunkedProcessor, process_in_chunks};
pub use crate::engine::{DrainState, Scheduler, SchedulerOptions, SchedulerStats};
pub use crate::queue::{TaskId, TaskOptions};
pub use crate::types::{DrainMode, Priority};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file or defaults) and CLI overrides
/// - the scheduler
/// - the demo workload
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = effective_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let scheduler = Scheduler::from_config(&cfg)?;
    info!(mode = ?scheduler.mode(), items = cfg.demo.items, "running background workload");

    let report = run_demo(&scheduler, &cfg).await?;
    print_report(&report);
    Ok(())
}

/// Load the config and apply CLI overrides on top of it.
fn effective_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = load_or_default(args.config.as_deref().map(Path::new))?;

    if let Some(mode) = args.mode {
        cfg.scheduler.mode = mode.into();
    }
    if let Some(ref filter) = args.filter {
        cfg.demo.filter = filter.trim().to_lowercase();
    }
    if let Some(items) = args.items {
        cfg.demo.items = items;
    }

    Ok(cfg)
}

fn print_dry_run(cfg: &ConfigFile) {
    println!("idlesched dry-run");
    println!("  scheduler.mode = {:?}", cfg.scheduler.mode);
    println!("  scheduler.idle_slice = {:?}", cfg.scheduler.idle_slice);
    if let Some(timeout) = cfg.scheduler.idle_timeout {
        println!("  scheduler.idle_timeout = {timeout:?}");
    }
    println!(
        "  scheduler.fallback_batch_size = {}",
        cfg.scheduler.fallback_batch_size
    );
    println!(
        "  scheduler.default_deadline = {:?}",
        cfg.scheduler.default_deadline
    );
    println!("  chunks.default_chunk_size = {}", cfg.chunks.default_chunk_size);
    println!("  demo.filter = {}", cfg.demo.filter);
    println!("  demo.items = {}", cfg.demo.items);

    debug!("dry-run complete (nothing scheduled)");
}

fn print_report(report: &DemoReport) {
    println!("filter '{}': {} card(s)", report.filter, report.visible_cards.len());
    for name in &report.visible_cards {
        println!("  - {name}");
    }

    println!("nearby ({} map move(s) handled):", report.map_moves_handled);
    for name in &report.nearby {
        println!("  - {name}");
    }

    println!("categories ({} slice(s)):", report.slices);
    for (category, count) in &report.category_counts {
        println!("  {category}: {count}");
    }

    if let Some(ref route) = report.route {
        println!(
            "route: {:.2} km, ~{:.0} min, {} points",
            route.distance_km,
            route.duration_min,
            route.path.len()
        );
    }

    let s = report.stats;
    println!(
        "scheduler: {} executed, {} failed, {} rejected, {} pass(es)",
        s.executed, s.failed, s.rejected, s.passes
    );
}
