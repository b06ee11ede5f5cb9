//! Route waypoint ordering by greedy nearest-neighbor.
//!
//! Tour construction only, not exact TSP: the visiting order is a documented
//! approximation and may be arbitrarily far from the optimal tour. Callers
//! wanting a comparison run [`total_distance`] on the order before and after.

use maptrace_core::{GeoPoint, ImageDimensions, ReferenceFrame, Result, Route, Waypoint};

use crate::spherical::haversine_distance;
use crate::transform::pixel_to_geo;

/// Greedy nearest-neighbor visiting order over `waypoints`, starting from
/// `start`.
///
/// Returns indices into `waypoints` in visit order. The end point terminates
/// the implicit tour but never influences the greedy choice; ties are broken
/// by first-encountered input order, so the result is deterministic.
pub fn optimize_order(start: GeoPoint, _end: GeoPoint, waypoints: &[GeoPoint]) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..waypoints.len()).collect();
    let mut order = Vec::with_capacity(waypoints.len());
    let mut position = start;

    while !remaining.is_empty() {
        let mut best_slot = 0;
        let mut best_distance = f64::INFINITY;
        for (slot, &idx) in remaining.iter().enumerate() {
            let d = haversine_distance(position, waypoints[idx]);
            if d < best_distance {
                best_distance = d;
                best_slot = slot;
            }
        }

        let idx = remaining.remove(best_slot);
        position = waypoints[idx];
        order.push(idx);
    }

    order
}

/// Total tour length in meters over `[start, ...ordered, end]`
pub fn total_distance(start: GeoPoint, end: GeoPoint, ordered: &[GeoPoint]) -> f64 {
    let mut total = 0.0;
    let mut position = start;
    for &point in ordered {
        total += haversine_distance(position, point);
        position = point;
    }
    total + haversine_distance(position, end)
}

/// Reorder a route's waypoints to approximately minimize travel distance.
///
/// Projects each waypoint through the frame, runs the greedy ordering between
/// the resolved start and end points, and returns a new waypoint list with
/// dense order tags 1..N. The input route is never mutated.
pub fn optimize_route(
    route: &Route,
    dims: ImageDimensions,
    frame: &ReferenceFrame,
    start: GeoPoint,
    end: GeoPoint,
) -> Result<Vec<Waypoint>> {
    let current = route.ordered_waypoints();
    let projected: Result<Vec<GeoPoint>> =
        current.iter().map(|w| pixel_to_geo(w.pixel, dims, frame)).collect();
    let projected = projected?;

    let order = optimize_order(start, end, &projected);
    tracing::debug!(
        waypoints = current.len(),
        before_m = total_distance(start, end, &projected),
        after_m = total_distance(
            start,
            end,
            &order.iter().map(|&i| projected[i]).collect::<Vec<_>>()
        ),
        "optimized route order"
    );

    Ok(order
        .into_iter()
        .enumerate()
        .map(|(visit, idx)| Waypoint::new(visit as u32 + 1, current[idx].pixel))
        .collect())
}
