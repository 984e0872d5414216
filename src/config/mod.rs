// src/config/mod.rs

//! Configuration loading and validation for idlesched.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn the raw model into a validated, typed [`ConfigFile`] (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{
    ChunkConfig, ChunkSection, ConfigFile, DemoConfig, DemoSection, RawConfigFile,
    SchedulerConfig, SchedulerSection,
};
pub use validate::validate_config;
