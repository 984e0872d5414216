// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::types::DrainMode;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [scheduler]
/// mode = "idle"
/// idle_slice_ms = 16
/// idle_timeout_ms = 2000
/// fallback_batch_size = 3
/// default_deadline_ms = 50
///
/// [chunks]
/// default_chunk_size = 100
///
/// [demo]
/// filter = "restaurant"
/// items = 250
/// ```
///
/// All sections are optional and have reasonable defaults. This is the raw,
/// unvalidated shape; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub chunks: ChunkSection,

    #[serde(default)]
    pub demo: DemoSection,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// `"idle"` (default) or `"fallback"`.
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Length of one idle slice handed out by the tokio idle host.
    #[serde(default = "default_idle_slice_ms")]
    pub idle_slice_ms: u64,

    /// If the host takes longer than this to grant an idle slice, the slice
    /// is flagged as timed out and runs regardless of its remaining time.
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,

    /// Number of tasks run per pass when no idle primitive is used.
    #[serde(default = "default_fallback_batch_size")]
    pub fallback_batch_size: usize,

    /// Deadline budget given to tasks that don't specify their own.
    #[serde(default = "default_deadline_ms")]
    pub default_deadline_ms: u64,
}

fn default_mode() -> String {
    "idle".to_string()
}

fn default_idle_slice_ms() -> u64 {
    16
}

fn default_fallback_batch_size() -> usize {
    3
}

fn default_deadline_ms() -> u64 {
    50
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            idle_slice_ms: default_idle_slice_ms(),
            idle_timeout_ms: None,
            fallback_batch_size: default_fallback_batch_size(),
            default_deadline_ms: default_deadline_ms(),
        }
    }
}

/// `[chunks]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkSection {
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,
}

fn default_chunk_size() -> usize {
    100
}

impl Default for ChunkSection {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
        }
    }
}

/// `[demo]` section, only read by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoSection {
    /// Card category to filter to; `"all"` keeps every card.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Number of cards pushed through the chunked processor.
    #[serde(default = "default_items")]
    pub items: usize,
}

fn default_filter() -> String {
    "all".to_string()
}

fn default_items() -> usize {
    250
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            items: default_items(),
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub scheduler: SchedulerConfig,
    pub chunks: ChunkConfig,
    pub demo: DemoConfig,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            chunks: ChunkConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub mode: DrainMode,
    pub idle_slice: Duration,
    pub idle_timeout: Option<Duration>,
    pub fallback_batch_size: usize,
    pub default_deadline: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            mode: DrainMode::default(),
            idle_slice: Duration::from_millis(default_idle_slice_ms()),
            idle_timeout: None,
            fallback_batch_size: default_fallback_batch_size(),
            default_deadline: Duration::from_millis(default_deadline_ms()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub default_chunk_size: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub filter: String,
    pub items: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            items: default_items(),
        }
    }
}
