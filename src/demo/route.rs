// src/demo/route.rs

//! Mock route calculation.

use tracing::debug;

use crate::demo::Coordinate;
use crate::engine::Scheduler;
use crate::queue::{TaskId, TaskOptions};

/// Interpolated points between start and end.
const INTERMEDIATE_POINTS: usize = 10;

/// Assumed average travel speed for the duration estimate.
const AVERAGE_SPEED_KMH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub distance_km: f64,
    pub duration_min: f64,
    pub path: Vec<Coordinate>,
}

impl Route {
    /// Build a route along `path`, summing leg distances.
    pub fn along(path: Vec<Coordinate>) -> Self {
        let distance_km: f64 = path.windows(2).map(|leg| leg[0].distance_km(&leg[1])).sum();
        Self {
            distance_km,
            duration_min: distance_km / AVERAGE_SPEED_KMH * 60.0,
            path,
        }
    }
}

/// Start, the waypoints, ten points on the straight line from start to end,
/// then end.
pub fn generate_mock_path(start: Coordinate, end: Coordinate, waypoints: &[Coordinate]) -> Vec<Coordinate> {
    let mut path = Vec::with_capacity(waypoints.len() + INTERMEDIATE_POINTS + 2);
    path.push(start);
    path.extend_from_slice(waypoints);

    for i in 0..INTERMEDIATE_POINTS {
        let ratio = (i + 1) as f64 / (INTERMEDIATE_POINTS + 1) as f64;
        path.push(Coordinate::new(
            start.lat + ratio * (end.lat - start.lat),
            start.lng + ratio * (end.lng - start.lng),
        ));
    }

    path.push(end);
    path
}

/// Compute a mock route as a normal-priority background task and hand it to
/// `callback`.
pub fn calculate_route_in_background<C>(
    scheduler: &Scheduler,
    start: Coordinate,
    end: Coordinate,
    waypoints: Vec<Coordinate>,
    callback: C,
) -> Option<TaskId>
where
    C: FnOnce(Route) + Send + 'static,
{
    scheduler.schedule_task(
        move || {
            debug!(?start, ?end, waypoints = waypoints.len(), "calculating route in background");
            let route = Route::along(generate_mock_path(start, end, &waypoints));
            callback(route);
            Ok(())
        },
        TaskOptions::normal().label("route"),
    )
}
