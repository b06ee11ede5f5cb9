//! The reference frame and the image/bounds geometry it applies to.

use serde::{Deserialize, Serialize};

use crate::models::point::GeoPoint;

/// Natural pixel size of the loaded raster.
///
/// Fixed once an image is decoded; every transform requires both sides to be
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when no usable image is loaded
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel coordinates of the image center
    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// The mutable calibration state tying image pixels to geographic space.
///
/// `scale` is a unitless multiplier on the Web-Mercator meters-per-pixel
/// baseline at `center.lat` and `zoom`; it converts pixels at natural
/// resolution into meters on the ground. Invariant: `scale > 0` and finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    pub center: GeoPoint,
    pub scale: f64,
    pub zoom: u8,
}

impl ReferenceFrame {
    /// Frame created when an image is first dropped onto the map, before any
    /// calibration has run.
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self { center, scale: 1.0, zoom }
    }

    pub fn with_scale(center: GeoPoint, scale: f64, zoom: u8) -> Self {
        Self { center, scale, zoom }
    }

    /// Center is finite and scale is a positive finite number
    pub fn is_valid(&self) -> bool {
        self.center.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

/// Rectangular geographic bounds the displayed image currently occupies.
///
/// Supplied by the renderer; only an exact inverse of the frame formula when
/// derived from the same frame via the four image corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl RectBounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self { north, south, east, west }
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// True when the rectangle has no usable area for interpolation
    pub fn is_degenerate(&self) -> bool {
        !self.lat_span().is_finite()
            || !self.lng_span().is_finite()
            || self.lat_span() == 0.0
            || self.lng_span() == 0.0
    }
}
