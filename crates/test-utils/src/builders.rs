#![allow(dead_code)]

use idlesched::config::{ConfigFile, RawConfigFile};
use idlesched::engine::SchedulerOptions;
use idlesched::types::DrainMode;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.config.scheduler.mode = mode.to_string();
        self
    }

    pub fn fallback_batch_size(mut self, size: usize) -> Self {
        self.config.scheduler.fallback_batch_size = size;
        self
    }

    pub fn default_deadline_ms(mut self, ms: u64) -> Self {
        self.config.scheduler.default_deadline_ms = ms;
        self
    }

    pub fn idle_slice_ms(mut self, ms: u64) -> Self {
        self.config.scheduler.idle_slice_ms = ms;
        self
    }

    pub fn default_chunk_size(mut self, size: usize) -> Self {
        self.config.chunks.default_chunk_size = size;
        self
    }

    pub fn demo_filter(mut self, filter: &str) -> Self {
        self.config.demo.filter = filter.to_string();
        self
    }

    pub fn demo_items(mut self, items: usize) -> Self {
        self.config.demo.items = items;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduler options in fallback mode with the given batch size.
pub fn fallback_options(batch_size: usize) -> SchedulerOptions {
    SchedulerOptions {
        mode: DrainMode::Fallback,
        fallback_batch_size: batch_size,
        ..SchedulerOptions::default()
    }
}
