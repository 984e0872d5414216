// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    ChunkConfig, ConfigFile, DemoConfig, RawConfigFile, SchedulerConfig,
};
use crate::errors::{IdleschedError, Result};
use crate::types::DrainMode;

/// Run semantic validation against a raw configuration.
///
/// This checks:
/// - `[scheduler].mode` is valid ("idle" or "fallback")
/// - `fallback_batch_size >= 1`
/// - `idle_slice_ms`, `default_deadline_ms` and `idle_timeout_ms` (if set) are non-zero
/// - `[chunks].default_chunk_size >= 1`
///
/// The `[demo].filter` string is not checked against known categories; an
/// unknown category simply filters every card out.
pub fn validate_config(raw: &RawConfigFile) -> Result<()> {
    parse_mode(raw)?;
    validate_scheduler(raw)?;
    validate_chunks(raw)?;
    Ok(())
}

fn parse_mode(raw: &RawConfigFile) -> Result<DrainMode> {
    raw.scheduler
        .mode
        .parse::<DrainMode>()
        .map_err(|e| IdleschedError::ConfigError(format!("[scheduler].mode: {e}")))
}

fn validate_scheduler(raw: &RawConfigFile) -> Result<()> {
    let s = &raw.scheduler;

    if s.fallback_batch_size == 0 {
        return Err(IdleschedError::ConfigError(
            "[scheduler].fallback_batch_size must be >= 1 (got 0)".to_string(),
        ));
    }
    if s.idle_slice_ms == 0 {
        return Err(IdleschedError::ConfigError(
            "[scheduler].idle_slice_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if s.default_deadline_ms == 0 {
        return Err(IdleschedError::ConfigError(
            "[scheduler].default_deadline_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    if s.idle_timeout_ms == Some(0) {
        return Err(IdleschedError::ConfigError(
            "[scheduler].idle_timeout_ms must be >= 1 when set (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_chunks(raw: &RawConfigFile) -> Result<()> {
    if raw.chunks.default_chunk_size == 0 {
        return Err(IdleschedError::ConfigError(
            "[chunks].default_chunk_size must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = IdleschedError;

    fn try_from(raw: RawConfigFile) -> Result<Self> {
        validate_config(&raw)?;
        let mode = parse_mode(&raw)?;

        let s = raw.scheduler;
        Ok(ConfigFile {
            scheduler: SchedulerConfig {
                mode,
                idle_slice: Duration::from_millis(s.idle_slice_ms),
                idle_timeout: s.idle_timeout_ms.map(Duration::from_millis),
                fallback_batch_size: s.fallback_batch_size,
                default_deadline: Duration::from_millis(s.default_deadline_ms),
            },
            chunks: ChunkConfig {
                default_chunk_size: raw.chunks.default_chunk_size,
            },
            demo: DemoConfig {
                filter: raw.demo.filter.trim().to_lowercase(),
                items: raw.demo.items,
            },
        })
    }
}
