//! Spherical geometry primitives.
//!
//! Two distinct Earth radii are in play and must not be mixed up:
//! [`EARTH_RADIUS_M`] is the great-circle (haversine) radius, while
//! [`EQUATORIAL_RADIUS_M`] is only used for meter-to-degree conversion in the
//! flat-Earth transform.

use maptrace_core::GeoPoint;

/// Mean Earth radius used for great-circle distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Equatorial Earth radius used for meter-to-degree conversion, in meters
pub const EQUATORIAL_RADIUS_M: f64 = 6_378_137.0;

/// Web-Mercator ground resolution at the equator at zoom 0, in meters per pixel
pub const MERCATOR_BASE_RESOLUTION: f64 = 156_543.033_92;

/// Haversine great-circle distance between two geographic points, in meters.
///
/// Symmetric, zero iff the points are equal, and satisfies the triangle
/// inequality within floating-point tolerance.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Ground meters covered by one screen pixel at the given latitude and zoom
/// level, under the spherical Web-Mercator approximation.
///
/// Monotonically decreases with zoom and reaches 0 at the poles. Callers must
/// treat a non-finite or non-positive result as a calibration failure rather
/// than propagate it into geometry.
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
    // cos(90°.to_radians()) is ~6.1e-17 in f64, not 0; force exact zero at
    // the poles so downstream guards on a non-positive factor actually trip.
    if lat.abs() >= 90.0 {
        return 0.0;
    }
    MERCATOR_BASE_RESOLUTION * lat.to_radians().cos() / 2f64.powi(zoom as i32)
}
