// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::DrainMode;

/// Command-line arguments for the `idlesched` demo.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "idlesched",
    version,
    about = "Drive the deferred task scheduler with the travel-companion background workloads.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML).
    ///
    /// If omitted, built-in defaults are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Override `[scheduler].mode` from the config.
    #[arg(long, value_enum, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Override `[demo].filter`: category the card list is re-filtered to.
    #[arg(long, value_name = "CATEGORY")]
    pub filter: Option<String>,

    /// Override `[demo].items`: number of cards pushed through the chunked processor.
    #[arg(long, value_name = "N")]
    pub items: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `IDLESCHED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate config, print it, but don't schedule anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Drain mode as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum ModeArg {
    Idle,
    Fallback,
}

impl From<ModeArg> for DrainMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Idle => DrainMode::Idle,
            ModeArg::Fallback => DrainMode::Fallback,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
