//! Routes, waypoints, and calibration inputs.

use serde::{Deserialize, Serialize};

use crate::error::{MaptraceError, Result};
use crate::models::point::{GeoPoint, PixelPoint};

/// A single route stop digitized on the source image.
///
/// `index` defines visiting order within the route; tags may be sparse but
/// must be monotonic after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub index: u32,
    pub pixel: PixelPoint,
}

impl Waypoint {
    pub fn new(index: u32, pixel: PixelPoint) -> Self {
        Self { index, pixel }
    }
}

/// An ordered waypoint chain between two named ground-control points.
///
/// `start_id`/`end_id` reference external control points; the route does not
/// store their locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub start_id: String,
    pub end_id: String,
    pub waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn new(start_id: impl Into<String>, end_id: impl Into<String>) -> Self {
        Self {
            start_id: start_id.into(),
            end_id: end_id.into(),
            waypoints: Vec::new(),
        }
    }

    /// Waypoints sorted by their order tag
    pub fn ordered_waypoints(&self) -> Vec<Waypoint> {
        let mut sorted = self.waypoints.clone();
        sorted.sort_by_key(|w| w.index);
        sorted
    }

    /// Replace the waypoint list, reassigning dense order tags 1..N
    pub fn set_waypoints(&mut self, pixels: Vec<PixelPoint>) {
        self.waypoints = pixels
            .into_iter()
            .enumerate()
            .map(|(i, pixel)| Waypoint::new(i as u32 + 1, pixel))
            .collect();
    }
}

/// A geographic point whose location is independently known (e.g., a
/// GPS-surveyed marker), keyed by identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub id: String,
    pub geo: GeoPoint,
}

impl ControlPoint {
    pub fn new(id: impl Into<String>, geo: GeoPoint) -> Self {
        Self { id: id.into(), geo }
    }
}

/// A pixel point paired with a known geographic location, used as
/// calibration input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub pixel: PixelPoint,
    pub geo: GeoPoint,
}

impl MatchedPair {
    pub fn new(pixel: PixelPoint, geo: GeoPoint) -> Self {
        Self { pixel, geo }
    }
}

/// Join digitized pixel points against control points on shared identifier.
///
/// Pixel points whose id has no control-point counterpart are skipped; the
/// caller decides whether the surviving pair count is enough to calibrate.
pub fn match_pairs(
    pixel_points: &[(String, PixelPoint)],
    control_points: &[ControlPoint],
) -> Vec<MatchedPair> {
    pixel_points
        .iter()
        .filter_map(|(id, pixel)| {
            control_points
                .iter()
                .find(|cp| cp.id == *id)
                .map(|cp| MatchedPair::new(*pixel, cp.geo))
        })
        .collect()
}

/// Look up a control point by id, as a typed failure when absent
pub fn find_control_point<'a>(
    control_points: &'a [ControlPoint],
    id: &str,
) -> Result<&'a ControlPoint> {
    control_points
        .iter()
        .find(|cp| cp.id == id)
        .ok_or_else(|| MaptraceError::ControlPointNotFound { id: id.to_string() })
}
