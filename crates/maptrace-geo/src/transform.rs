//! Pixel/geographic coordinate transforms under a reference frame.
//!
//! The two directions are intentionally not a single analytic pair.
//! [`pixel_to_geo`] is the center+scale formula; [`geo_to_pixel`] is a
//! bounds-relative bilinear inverse that is exact only when the bounds were
//! derived from the same frame (see [`frame_bounds`]). During a resize-drag
//! the renderer supplies bounds that never came from the formula, so the
//! interpolating inverse is the one that matches what the user sees.

use maptrace_core::{
    GeoPoint, ImageDimensions, MaptraceError, PixelPoint, RectBounds, ReferenceFrame, Result,
};

use crate::spherical::{meters_per_pixel, EQUATORIAL_RADIUS_M};

/// Ground meters covered by one natural-resolution image pixel under `frame`.
///
/// Fails when the Mercator factor is non-finite or non-positive (latitude at
/// or beyond the poles, invalid frame) so NaN never reaches a `GeoPoint`.
fn ground_resolution(frame: &ReferenceFrame) -> Result<f64> {
    let factor = frame.scale * meters_per_pixel(frame.center.lat, frame.zoom);
    if !factor.is_finite() || factor <= 0.0 {
        return Err(MaptraceError::CalibrationDiverged {
            reason: format!(
                "ground resolution {} at lat {} zoom {} is unusable",
                factor, frame.center.lat, frame.zoom
            ),
        });
    }
    Ok(factor)
}

/// Convert an image pixel to geographic coordinates.
///
/// Offset from the image center is scaled to meters, then to a geographic
/// delta with a flat-Earth approximation around `frame.center`. Pixel y grows
/// downward, so geographic north is a decrease in pixel y.
pub fn pixel_to_geo(
    pixel: PixelPoint,
    dims: ImageDimensions,
    frame: &ReferenceFrame,
) -> Result<GeoPoint> {
    if dims.is_degenerate() {
        return Err(MaptraceError::NoImage { width: dims.width, height: dims.height });
    }

    let ground = ground_resolution(frame)?;
    let (cx, cy) = dims.center();

    let dx_meters = (pixel.x - cx) * ground;
    let dy_meters = (pixel.y - cy) * ground;

    let dlat = (dy_meters / EQUATORIAL_RADIUS_M).to_degrees();
    let dlng =
        (dx_meters / (EQUATORIAL_RADIUS_M * frame.center.lat.to_radians().cos())).to_degrees();

    let geo = GeoPoint::new(frame.center.lat - dlat, frame.center.lng + dlng);
    if !geo.is_finite() {
        return Err(MaptraceError::CalibrationDiverged {
            reason: format!("pixel ({}, {}) projected to non-finite geometry", pixel.x, pixel.y),
        });
    }
    Ok(geo)
}

/// Geographic bounds the image occupies under `frame`: [`pixel_to_geo`]
/// applied to the four image corners.
///
/// These bounds become stale the moment the frame mutates; recompute rather
/// than cache them across a calibration.
pub fn frame_bounds(dims: ImageDimensions, frame: &ReferenceFrame) -> Result<RectBounds> {
    let north_west = pixel_to_geo(PixelPoint::new(0.0, 0.0), dims, frame)?;
    let south_east =
        pixel_to_geo(PixelPoint::new(dims.width as f64, dims.height as f64), dims, frame)?;

    Ok(RectBounds::new(north_west.lat, south_east.lat, south_east.lng, north_west.lng))
}

/// Convert a geographic point to an image pixel, relative to the displayed
/// bounds.
///
/// Normalized position within the rectangle scaled by the image dimensions.
/// Exact inverse of [`pixel_to_geo`] only when `bounds` came from the same
/// frame via [`frame_bounds`].
pub fn geo_to_pixel(geo: GeoPoint, bounds: RectBounds, dims: ImageDimensions) -> Result<PixelPoint> {
    if dims.is_degenerate() {
        return Err(MaptraceError::NoImage { width: dims.width, height: dims.height });
    }
    if bounds.is_degenerate() {
        return Err(MaptraceError::DegenerateBounds {
            reason: format!(
                "lat span {}, lng span {}",
                bounds.lat_span(),
                bounds.lng_span()
            ),
        });
    }

    let fx = (geo.lng - bounds.west) / bounds.lng_span();
    let fy = (bounds.north - geo.lat) / bounds.lat_span();

    Ok(PixelPoint::new(fx * dims.width as f64, fy * dims.height as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spherical::MERCATOR_BASE_RESOLUTION;

    fn test_frame() -> ReferenceFrame {
        ReferenceFrame::with_scale(GeoPoint::new(34.853667, 135.472041), 0.8, 15)
    }

    fn test_dims() -> ImageDimensions {
        ImageDimensions::new(726, 624)
    }

    #[test]
    fn test_image_center_maps_to_frame_center() {
        let frame = test_frame();
        let geo = pixel_to_geo(PixelPoint::new(363.0, 312.0), test_dims(), &frame).unwrap();
        assert_eq!(geo.lat, frame.center.lat);
        assert_eq!(geo.lng, frame.center.lng);
    }

    #[test]
    fn test_one_pixel_right_moves_east() {
        let frame = test_frame();
        let dims = test_dims();
        let center = pixel_to_geo(PixelPoint::new(363.0, 312.0), dims, &frame).unwrap();
        let east = pixel_to_geo(PixelPoint::new(364.0, 312.0), dims, &frame).unwrap();

        let dlng = east.lng - center.lng;
        assert!(dlng > 0.0);

        // cos(lat) in meters_per_pixel cancels against the flat-Earth
        // longitude division, leaving the equatorial baseline.
        let expected = MERCATOR_BASE_RESOLUTION / 2f64.powi(15) * 0.8 / EQUATORIAL_RADIUS_M
            * 180.0
            / std::f64::consts::PI;
        assert!((dlng - expected).abs() < 1e-12);
        assert_eq!(east.lat, center.lat);
    }

    #[test]
    fn test_pixel_up_is_north() {
        let frame = test_frame();
        let dims = test_dims();
        let center = pixel_to_geo(PixelPoint::new(363.0, 312.0), dims, &frame).unwrap();
        let up = pixel_to_geo(PixelPoint::new(363.0, 311.0), dims, &frame).unwrap();
        assert!(up.lat > center.lat);
    }

    #[test]
    fn test_out_of_range_pixels_do_not_fail() {
        let frame = test_frame();
        let geo = pixel_to_geo(PixelPoint::new(-50.0, 10_000.0), test_dims(), &frame).unwrap();
        assert!(geo.is_finite());
    }

    #[test]
    fn test_zero_dims_is_no_image() {
        let frame = test_frame();
        let err = pixel_to_geo(PixelPoint::new(1.0, 1.0), ImageDimensions::new(0, 624), &frame)
            .unwrap_err();
        assert!(matches!(err, MaptraceError::NoImage { .. }));

        let bounds = RectBounds::new(35.0, 34.0, 136.0, 135.0);
        let err = geo_to_pixel(GeoPoint::new(34.5, 135.5), bounds, ImageDimensions::new(726, 0))
            .unwrap_err();
        assert!(matches!(err, MaptraceError::NoImage { .. }));
    }

    #[test]
    fn test_polar_frame_is_divergence_not_nan() {
        let frame = ReferenceFrame::with_scale(GeoPoint::new(90.0, 0.0), 1.0, 15);
        let err = pixel_to_geo(PixelPoint::new(1.0, 1.0), test_dims(), &frame).unwrap_err();
        assert!(matches!(err, MaptraceError::CalibrationDiverged { .. }));
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let flat = RectBounds::new(35.0, 35.0, 136.0, 135.0);
        let err = geo_to_pixel(GeoPoint::new(35.0, 135.5), flat, test_dims()).unwrap_err();
        assert!(matches!(err, MaptraceError::DegenerateBounds { .. }));
    }

    #[test]
    fn test_frame_bounds_orientation() {
        let bounds = frame_bounds(test_dims(), &test_frame()).unwrap();
        assert!(bounds.north > bounds.south);
        assert!(bounds.east > bounds.west);
    }

    #[test]
    fn test_round_trip_under_frame_derived_bounds() {
        let frame = test_frame();
        let dims = test_dims();
        let bounds = frame_bounds(dims, &frame).unwrap();

        for &(x, y) in &[(10.0, 10.0), (363.0, 312.0), (700.0, 600.0), (1.0, 623.0)] {
            let pixel = PixelPoint::new(x, y);
            let geo = pixel_to_geo(pixel, dims, &frame).unwrap();
            let back = geo_to_pixel(geo, bounds, dims).unwrap();
            assert!(
                (back.x - x).abs() < 0.5 && (back.y - y).abs() < 0.5,
                "round trip of ({}, {}) gave ({}, {})",
                x,
                y,
                back.x,
                back.y
            );
        }
    }
}
