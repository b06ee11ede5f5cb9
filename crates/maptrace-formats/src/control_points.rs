//! Control-point and matched-pair document readers.

use std::fs;
use std::path::Path;

use maptrace_core::{ControlPoint, GeoPoint, MaptraceError, MatchedPair, PixelPoint, Result};
use serde_json::Value;

/// Read named ground-control points: an array of `{id, lat, lng}` objects.
/// `lon` is accepted as a legacy spelling of `lng`.
pub fn read_control_points<P: AsRef<Path>>(path: P) -> Result<Vec<ControlPoint>> {
    let array = read_array(path.as_ref())?;

    array
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            let object = raw.as_object().ok_or_else(|| MaptraceError::DocumentInvalid {
                reason: format!("control point {} is not an object", position),
            })?;

            let id = object.get("id").and_then(Value::as_str).ok_or_else(|| {
                MaptraceError::DocumentInvalid {
                    reason: format!("control point {} has no id", position),
                }
            })?;
            let geo = parse_geo(object, position)?;

            Ok(ControlPoint::new(id, geo))
        })
        .collect()
}

/// Read calibration pairs: an array of `{pixel: {x, y}, geo: {lat, lng}}`
/// objects, or the flat legacy `{x, y, lat, lng}` form.
pub fn read_matched_pairs<P: AsRef<Path>>(path: P) -> Result<Vec<MatchedPair>> {
    let array = read_array(path.as_ref())?;

    array
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            let object = raw.as_object().ok_or_else(|| MaptraceError::DocumentInvalid {
                reason: format!("matched pair {} is not an object", position),
            })?;

            let pixel_source = object.get("pixel").and_then(Value::as_object).unwrap_or(object);
            let (x, y) = match (
                pixel_source.get("x").and_then(Value::as_f64),
                pixel_source.get("y").and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(MaptraceError::DocumentInvalid {
                        reason: format!("matched pair {} has no pixel coordinates", position),
                    })
                }
            };

            let geo_source = object.get("geo").and_then(Value::as_object).unwrap_or(object);
            let geo = parse_geo(geo_source, position)?;

            Ok(MatchedPair::new(PixelPoint::new(x, y), geo))
        })
        .collect()
}

/// Read digitized pixel points keyed by control-point id: an array of
/// `{id, x, y}` objects. Joining them against control points is the
/// caller's job.
pub fn read_pixel_points<P: AsRef<Path>>(path: P) -> Result<Vec<(String, PixelPoint)>> {
    let array = read_array(path.as_ref())?;

    array
        .iter()
        .enumerate()
        .map(|(position, raw)| {
            let object = raw.as_object().ok_or_else(|| MaptraceError::DocumentInvalid {
                reason: format!("pixel point {} is not an object", position),
            })?;

            let id = object.get("id").and_then(Value::as_str).ok_or_else(|| {
                MaptraceError::DocumentInvalid {
                    reason: format!("pixel point {} has no id", position),
                }
            })?;
            let (x, y) = match (
                object.get("x").and_then(Value::as_f64),
                object.get("y").and_then(Value::as_f64),
            ) {
                (Some(x), Some(y)) => (x, y),
                _ => {
                    return Err(MaptraceError::DocumentInvalid {
                        reason: format!("pixel point {} has no x/y coordinates", position),
                    })
                }
            };

            Ok((id.to_string(), PixelPoint::new(x, y)))
        })
        .collect()
}

fn read_array(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| MaptraceError::DocumentInvalid { reason: format!("not valid JSON: {}", e) })?;

    value.as_array().cloned().ok_or_else(|| MaptraceError::DocumentInvalid {
        reason: "document must be a JSON array".to_string(),
    })
}

fn parse_geo(object: &serde_json::Map<String, Value>, position: usize) -> Result<GeoPoint> {
    let lat = object.get("lat").and_then(Value::as_f64);
    let lng = object
        .get("lng")
        .or_else(|| object.get("lon"))
        .and_then(Value::as_f64);

    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(GeoPoint::new(lat, lng)),
        _ => Err(MaptraceError::DocumentInvalid {
            reason: format!("entry {} has no lat/lng coordinates", position),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(value: &Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(value).unwrap()).unwrap();
        file
    }

    #[test]
    fn test_read_control_points() {
        let file = write_temp(&json!([
            { "id": "gate", "lat": 34.85, "lng": 135.47 },
            { "id": "summit", "lat": 34.86, "lon": 135.48 },
        ]));

        let points = read_control_points(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].id, "gate");
        // Legacy "lon" spelling
        assert_eq!(points[1].geo.lng, 135.48);
    }

    #[test]
    fn test_control_point_missing_id() {
        let file = write_temp(&json!([{ "lat": 1.0, "lng": 2.0 }]));
        let err = read_control_points(file.path()).unwrap_err();
        assert!(matches!(err, MaptraceError::DocumentInvalid { .. }));
    }

    #[test]
    fn test_read_matched_pairs_nested() {
        let file = write_temp(&json!([
            { "pixel": { "x": 10.0, "y": 20.0 }, "geo": { "lat": 34.85, "lng": 135.47 } },
        ]));

        let pairs = read_matched_pairs(file.path()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].pixel.y, 20.0);
        assert_eq!(pairs[0].geo.lat, 34.85);
    }

    #[test]
    fn test_read_matched_pairs_flat_legacy() {
        let file = write_temp(&json!([
            { "x": 1.0, "y": 2.0, "lat": 34.0, "lng": 135.0 },
        ]));

        let pairs = read_matched_pairs(file.path()).unwrap();
        assert_eq!(pairs[0].pixel.x, 1.0);
        assert_eq!(pairs[0].geo.lng, 135.0);
    }

    #[test]
    fn test_read_pixel_points() {
        let file = write_temp(&json!([
            { "id": "gate", "x": 100.0, "y": 50.0 },
            { "id": "summit", "x": 600.0, "y": 50.0 },
        ]));

        let points = read_pixel_points(file.path()).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].0, "gate");
        assert_eq!(points[1].1, PixelPoint::new(600.0, 50.0));
    }

    #[test]
    fn test_pixel_point_missing_coordinates() {
        let file = write_temp(&json!([{ "id": "gate", "x": 1.0 }]));
        let err = read_pixel_points(file.path()).unwrap_err();
        assert!(matches!(err, MaptraceError::DocumentInvalid { .. }));
    }

    #[test]
    fn test_non_array_document() {
        let file = write_temp(&json!({ "id": "gate" }));
        assert!(read_control_points(file.path()).is_err());
        assert!(read_matched_pairs(file.path()).is_err());
    }
}
