//! Reference-frame calibration from matched ground-control pairs.
//!
//! Fitting center and scale is not a closed-form regression because the
//! Web-Mercator meters-per-pixel factor depends on the unknown center
//! latitude. The search is a coordinate-descent-style local heuristic: a 3x3
//! grid of candidate centers with an exponentially shrinking step, each
//! candidate paired with its closed-form least-squares scale. Deterministic
//! for identical inputs; the result is a local, not global, optimum.

use maptrace_core::config::LayeredConfig;
use maptrace_core::{
    GeoPoint, ImageDimensions, MaptraceError, MatchedPair, PixelPoint, ReferenceFrame, Result,
};
use serde::Serialize;

use crate::spherical::{haversine_distance, meters_per_pixel, EQUATORIAL_RADIUS_M};
use crate::transform::pixel_to_geo;

/// Tunables for the local search
#[derive(Debug, Clone, Copy)]
pub struct CalibrationConfig {
    pub iterations: u32,
    pub initial_step_deg: f64,
    pub step_decay: f64,
    pub scale_floor: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            iterations: 50,
            initial_step_deg: 1e-4,
            step_decay: 0.9,
            scale_floor: 1e-3,
        }
    }
}

impl From<&LayeredConfig> for CalibrationConfig {
    fn from(config: &LayeredConfig) -> Self {
        Self {
            iterations: config.iterations.value,
            initial_step_deg: config.initial_step_deg.value,
            step_decay: config.step_decay.value,
            scale_floor: config.scale_floor.value,
        }
    }
}

/// A fitted reference frame plus caller-side diagnostics
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CalibrationFit {
    pub frame: ReferenceFrame,
    /// Sum of squared positional errors over all pairs, in square meters
    pub squared_error_m2: f64,
    pub pairs_used: usize,
}

impl CalibrationFit {
    /// Root-mean-square positional error in meters
    pub fn rms_error_m(&self) -> f64 {
        if self.pairs_used == 0 {
            return 0.0;
        }
        (self.squared_error_m2 / self.pairs_used as f64).sqrt()
    }
}

/// Fit a reference frame's center and scale from matched pairs.
///
/// Requires at least 2 pairs and a non-degenerate image. `current` only
/// supplies the fallback scale when the first two pairs have coincident
/// pixels; the fit never depends on the current center.
pub fn calibrate(
    pairs: &[MatchedPair],
    dims: ImageDimensions,
    zoom: u8,
    current: &ReferenceFrame,
    config: &CalibrationConfig,
) -> Result<CalibrationFit> {
    if pairs.len() < 2 {
        return Err(MaptraceError::InsufficientPairs { found: pairs.len() });
    }
    if dims.is_degenerate() {
        return Err(MaptraceError::NoImage { width: dims.width, height: dims.height });
    }

    let centroid = geo_centroid(pairs);
    let initial_scale = initial_scale_estimate(pairs, centroid, zoom, current.scale);

    let mut best_center = centroid;
    let mut best_scale = initial_scale.max(config.scale_floor);
    let mut best_error = squared_error(
        pairs,
        dims,
        &ReferenceFrame::with_scale(best_center, best_scale, zoom),
    );

    for iteration in 0..config.iterations {
        let step = config.initial_step_deg * config.step_decay.powi(iteration as i32);

        let around = best_center;
        for dlat in [-1.0, 0.0, 1.0] {
            for dlng in [-1.0, 0.0, 1.0] {
                let candidate_center =
                    GeoPoint::new(around.lat + dlat * step, around.lng + dlng * step);
                let candidate_scale =
                    optimal_scale(pairs, dims, candidate_center, zoom, config.scale_floor)
                        .unwrap_or(best_scale);

                let candidate =
                    ReferenceFrame::with_scale(candidate_center, candidate_scale, zoom);
                let error = squared_error(pairs, dims, &candidate);

                // Strict comparison: first-found wins on ties.
                if error < best_error {
                    best_error = error;
                    best_center = candidate_center;
                    best_scale = candidate_scale;
                }
            }
        }
    }

    let frame = ReferenceFrame::with_scale(best_center, best_scale, zoom);
    if !frame.is_valid() || !best_error.is_finite() {
        return Err(MaptraceError::CalibrationDiverged {
            reason: format!(
                "fitted center ({}, {}) scale {} error {}",
                best_center.lat, best_center.lng, best_scale, best_error
            ),
        });
    }

    tracing::debug!(
        pairs = pairs.len(),
        lat = best_center.lat,
        lng = best_center.lng,
        scale = best_scale,
        squared_error_m2 = best_error,
        "calibration converged"
    );

    Ok(CalibrationFit {
        frame,
        squared_error_m2: best_error,
        pairs_used: pairs.len(),
    })
}

/// Arithmetic mean of the matched geographic points
fn geo_centroid(pairs: &[MatchedPair]) -> GeoPoint {
    let n = pairs.len() as f64;
    let lat = pairs.iter().map(|p| p.geo.lat).sum::<f64>() / n;
    let lng = pairs.iter().map(|p| p.geo.lng).sum::<f64>() / n;
    GeoPoint::new(lat, lng)
}

/// Seed scale from the first two pairs; falls back to the current scale when
/// their pixels coincide or the Mercator factor is unusable.
fn initial_scale_estimate(
    pairs: &[MatchedPair],
    center: GeoPoint,
    zoom: u8,
    fallback: f64,
) -> f64 {
    let pixel_distance = pairs[0].pixel.distance_to(&pairs[1].pixel);
    let mpp = meters_per_pixel(center.lat, zoom);
    if pixel_distance == 0.0 || !mpp.is_finite() || mpp <= 0.0 {
        return fallback;
    }

    let geo_distance = haversine_distance(pairs[0].geo, pairs[1].geo);
    geo_distance / pixel_distance / mpp
}

/// Meters from `center` to `geo` under the flat-Earth conversion the
/// transform itself uses.
///
/// The closed-form scale must measure with the same metric that
/// `pixel_to_geo` converts with; mixing in the haversine radius here would
/// bias every fitted scale by the ratio of the two Earth radii.
fn flat_earth_distance(center: GeoPoint, geo: GeoPoint) -> f64 {
    let dy_meters = (geo.lat - center.lat).to_radians() * EQUATORIAL_RADIUS_M;
    let dx_meters =
        (geo.lng - center.lng).to_radians() * EQUATORIAL_RADIUS_M * center.lat.to_radians().cos();
    (dx_meters * dx_meters + dy_meters * dy_meters).sqrt()
}

/// Closed-form least-squares scale for a fixed candidate center.
///
/// Minimizes sum((ratio_i - m) * d_i)^2 over ground resolutions m, where d_i
/// is the pixel distance from the image center and ratio_i the observed
/// meters per pixel for pair i. Returns None when every pair sits on the
/// image center or the Mercator factor is unusable.
fn optimal_scale(
    pairs: &[MatchedPair],
    dims: ImageDimensions,
    center: GeoPoint,
    zoom: u8,
    scale_floor: f64,
) -> Option<f64> {
    let (cx, cy) = dims.center();
    let image_center = PixelPoint::new(cx, cy);

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    for pair in pairs {
        let pixel_distance = pair.pixel.distance_to(&image_center);
        if pixel_distance == 0.0 {
            continue;
        }
        let geo_distance = flat_earth_distance(center, pair.geo);
        let ratio = geo_distance / pixel_distance;

        weighted_sum += ratio * pixel_distance * pixel_distance;
        weight_total += pixel_distance * pixel_distance;
    }

    if weight_total == 0.0 {
        return None;
    }

    let mpp = meters_per_pixel(center.lat, zoom);
    if !mpp.is_finite() || mpp <= 0.0 {
        return None;
    }

    let scale = (weighted_sum / weight_total) / mpp;
    if !scale.is_finite() {
        return None;
    }
    Some(scale.max(scale_floor))
}

/// Total squared positional error of a candidate frame over all pairs, in
/// square meters. Candidates that fail to project at all rank last.
fn squared_error(pairs: &[MatchedPair], dims: ImageDimensions, frame: &ReferenceFrame) -> f64 {
    let mut total = 0.0;
    for pair in pairs {
        match pixel_to_geo(pair.pixel, dims, frame) {
            Ok(predicted) => {
                let error = haversine_distance(predicted, pair.geo);
                total += error * error;
            }
            Err(_) => return f64::INFINITY,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_pairs(
        frame: &ReferenceFrame,
        dims: ImageDimensions,
        pixels: &[(f64, f64)],
    ) -> Vec<MatchedPair> {
        pixels
            .iter()
            .map(|&(x, y)| {
                let pixel = PixelPoint::new(x, y);
                let geo = pixel_to_geo(pixel, dims, frame).unwrap();
                MatchedPair::new(pixel, geo)
            })
            .collect()
    }

    #[test]
    fn test_recovers_exact_parameters_on_noise_free_data() {
        let dims = ImageDimensions::new(726, 624);
        let truth = ReferenceFrame::with_scale(GeoPoint::new(34.8, 135.5), 1.0, 15);
        // Pixel centroid on the image center, so the centroid seed starts the
        // search inside the shrinking neighborhood of the true center.
        let pairs =
            synthetic_pairs(&truth, dims, &[(163.0, 212.0), (563.0, 212.0), (363.0, 512.0)]);

        let seed = ReferenceFrame::new(GeoPoint::new(34.0, 135.0), 15);
        let fit =
            calibrate(&pairs, dims, 15, &seed, &CalibrationConfig::default()).unwrap();

        assert!(
            (fit.frame.center.lat - truth.center.lat).abs() < 1e-4,
            "lat {} vs {}",
            fit.frame.center.lat,
            truth.center.lat
        );
        assert!((fit.frame.center.lng - truth.center.lng).abs() < 1e-4);
        assert!((fit.frame.scale - truth.scale).abs() < 1e-3);
    }

    #[test]
    fn test_recovers_non_unit_scale() {
        let dims = ImageDimensions::new(726, 624);
        let truth = ReferenceFrame::with_scale(GeoPoint::new(34.853667, 135.472041), 0.8, 15);
        let pairs = synthetic_pairs(
            &truth,
            dims,
            &[(63.0, 112.0), (663.0, 112.0), (63.0, 512.0), (663.0, 512.0)],
        );

        let seed = ReferenceFrame::new(GeoPoint::new(34.85, 135.47), 15);
        let fit =
            calibrate(&pairs, dims, 15, &seed, &CalibrationConfig::default()).unwrap();

        assert!((fit.frame.scale - 0.8).abs() < 1e-3, "scale {}", fit.frame.scale);
        assert!(fit.rms_error_m() < 1.0, "rms {}", fit.rms_error_m());
    }

    #[test]
    fn test_single_pair_is_precondition_failure() {
        let dims = ImageDimensions::new(726, 624);
        let pair = MatchedPair::new(PixelPoint::new(1.0, 1.0), GeoPoint::new(34.8, 135.5));
        let seed = ReferenceFrame::new(GeoPoint::new(34.8, 135.5), 15);

        let err =
            calibrate(&[pair], dims, 15, &seed, &CalibrationConfig::default()).unwrap_err();
        assert!(matches!(err, MaptraceError::InsufficientPairs { found: 1 }));
    }

    #[test]
    fn test_degenerate_dims_rejected() {
        let pairs = vec![
            MatchedPair::new(PixelPoint::new(1.0, 1.0), GeoPoint::new(34.8, 135.5)),
            MatchedPair::new(PixelPoint::new(2.0, 2.0), GeoPoint::new(34.9, 135.6)),
        ];
        let seed = ReferenceFrame::new(GeoPoint::new(34.8, 135.5), 15);

        let err = calibrate(&pairs, ImageDimensions::new(0, 0), 15, &seed, &Default::default())
            .unwrap_err();
        assert!(matches!(err, MaptraceError::NoImage { .. }));
    }

    #[test]
    fn test_coincident_pixels_fall_back_to_current_scale() {
        let pairs = vec![
            MatchedPair::new(PixelPoint::new(5.0, 5.0), GeoPoint::new(34.80, 135.50)),
            MatchedPair::new(PixelPoint::new(5.0, 5.0), GeoPoint::new(34.81, 135.51)),
        ];
        let seed = ReferenceFrame::with_scale(GeoPoint::new(34.8, 135.5), 2.5, 15);

        let estimate = initial_scale_estimate(&pairs, geo_centroid(&pairs), 15, seed.scale);
        assert_eq!(estimate, 2.5);
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let dims = ImageDimensions::new(500, 400);
        let truth = ReferenceFrame::with_scale(GeoPoint::new(-8.5, 115.26), 1.3, 14);
        let pairs =
            synthetic_pairs(&truth, dims, &[(20.0, 30.0), (480.0, 60.0), (250.0, 390.0)]);
        let seed = ReferenceFrame::new(GeoPoint::new(-8.0, 115.0), 14);

        let a = calibrate(&pairs, dims, 14, &seed, &Default::default()).unwrap();
        let b = calibrate(&pairs, dims, 14, &seed, &Default::default()).unwrap();
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.squared_error_m2, b.squared_error_m2);
    }

    #[test]
    fn test_scale_clamped_to_floor() {
        let dims = ImageDimensions::new(500, 400);
        // All pairs at the same geographic point: optimal ground resolution 0.
        let geo = GeoPoint::new(34.8, 135.5);
        let scale = optimal_scale(
            &[
                MatchedPair::new(PixelPoint::new(10.0, 10.0), geo),
                MatchedPair::new(PixelPoint::new(400.0, 300.0), geo),
            ],
            dims,
            geo,
            15,
            1e-3,
        )
        .unwrap();
        assert_eq!(scale, 1e-3);
    }
}
