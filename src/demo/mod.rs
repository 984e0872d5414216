// src/demo/mod.rs

//! Travel-companion workloads used by the `idlesched` binary.
//!
//! These are the kinds of jobs the UI pushed into the background: re-filtering
//! the recommendation cards, ranking places by distance, and computing a
//! mock route between two points.

pub mod catalog;
pub mod route;
pub mod workload;

pub use catalog::{Recommendation, filter_by_category, mock_recommendations, rank_by_distance, sample_cards};
pub use route::{Route, calculate_route_in_background, generate_mock_path};
pub use workload::{DemoReport, run_demo};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance (haversine) in kilometres.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}
