//! Geographic and pixel point value types.
//!
//! Both are plain Copy data: no component holds hidden references into
//! another's state, and the reference frame is always passed explicitly.

use serde::{Deserialize, Serialize};

/// A geographic point in degrees (WGS84-like, no datum correction)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    /// `geo` points are (x, y) = (lng, lat)
    fn from(p: geo::Point<f64>) -> Self {
        Self { lat: p.y(), lng: p.x() }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lng, p.lat)
    }
}

/// Pixel offset from the top-left of the source image's natural
/// (unscaled) pixel grid.
///
/// Values outside the image are permitted; transforms must not fail for
/// out-of-range points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another pixel point, in pixels
    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
