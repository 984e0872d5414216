// src/timing/mod.rs

//! Rate-limiting wrappers for callbacks that fire in bursts (search input,
//! map move events, scroll handlers).
//!
//! - [`debounce`]: run once, after the burst has been quiet for `wait`.
//! - [`throttle`]: run at most once per `limit`, dropping calls in between.

pub mod debounce;
pub mod throttle;

use std::time::Duration;

pub use debounce::Debounced;
pub use throttle::Throttled;

pub const DEFAULT_DEBOUNCE_WAIT: Duration = Duration::from_millis(300);
pub const DEFAULT_THROTTLE_LIMIT: Duration = Duration::from_millis(300);
