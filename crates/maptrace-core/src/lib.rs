//! maptrace-core - Canonical value types, errors, and configuration
//!
//! This crate holds the plain data model shared by every maptrace crate:
//! geographic and pixel points, the reference frame that ties them together,
//! routes, and calibration inputs.

pub mod config;
pub mod error;
pub mod models;

pub use error::{MaptraceError, Result};
pub use models::{
    find_control_point, match_pairs, ControlPoint, GeoPoint, ImageDimensions, MatchedPair,
    PixelPoint, RectBounds, ReferenceFrame, Route, Waypoint,
};
