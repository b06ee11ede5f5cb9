//! Domain models for maptrace

pub mod frame;
pub mod point;
pub mod route;

pub use frame::{ImageDimensions, RectBounds, ReferenceFrame};
pub use point::{GeoPoint, PixelPoint};
pub use route::{find_control_point, match_pairs, ControlPoint, MatchedPair, Route, Waypoint};
