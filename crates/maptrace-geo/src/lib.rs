//! maptrace-geo - The numeric core of maptrace
//!
//! Three tightly coupled components sharing one coordinate-frame model and
//! one distance metric: the pixel/geographic coordinate transform, the
//! reference-frame calibrator, and the route waypoint optimizer. All of them
//! are pure, synchronous, single-threaded computations over plain value data.

pub mod calibrate;
pub mod route;
pub mod spherical;
pub mod transform;

pub use calibrate::{calibrate, CalibrationConfig, CalibrationFit};
pub use route::{optimize_order, optimize_route, total_distance};
pub use spherical::{haversine_distance, meters_per_pixel, EARTH_RADIUS_M, EQUATORIAL_RADIUS_M};
pub use transform::{frame_bounds, geo_to_pixel, pixel_to_geo};
