//! Route document reader/writer.
//!
//! Legacy variants accepted on read (canonical name first):
//! - waypoint array under `waypoints`, `points`, or `markers`
//! - start reference under `start_id`, `startId`, `start`, or `from`
//! - end reference under `end_id`, `endId`, `end`, or `to`
//! - waypoint pixel either nested (`pixel: {x, y}`) or flat (`x`, `y`)
//! - missing `index` assigned array position + 1
//!
//! Writing always emits the canonical field names.

use std::fs;
use std::path::Path;

use maptrace_core::{MaptraceError, PixelPoint, Result, Route, Waypoint};
use serde_json::Value;

const WAYPOINT_KEYS: [&str; 3] = ["waypoints", "points", "markers"];
const START_KEYS: [&str; 4] = ["start_id", "startId", "start", "from"];
const END_KEYS: [&str; 4] = ["end_id", "endId", "end", "to"];

/// Read and normalize a route document from disk
pub fn read_route<P: AsRef<Path>>(path: P) -> Result<Route> {
    let content = fs::read_to_string(path.as_ref())?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| MaptraceError::DocumentInvalid { reason: format!("not valid JSON: {}", e) })?;
    parse_route(&value)
}

/// Write a route in canonical form
pub fn write_route<P: AsRef<Path>>(path: P, route: &Route) -> Result<()> {
    let json = serde_json::to_string_pretty(route)
        .map_err(|e| MaptraceError::Serialization(e.to_string()))?;
    fs::write(path.as_ref(), json)?;
    Ok(())
}

/// Normalize a parsed route document into the canonical `Route` shape
pub fn parse_route(value: &Value) -> Result<Route> {
    let object = value.as_object().ok_or_else(|| MaptraceError::DocumentInvalid {
        reason: "route document must be a JSON object".to_string(),
    })?;

    let start_id = first_string(object, &START_KEYS).ok_or_else(|| {
        MaptraceError::DocumentInvalid {
            reason: "missing start reference (startId/start/from)".to_string(),
        }
    })?;
    let end_id = first_string(object, &END_KEYS).ok_or_else(|| MaptraceError::DocumentInvalid {
        reason: "missing end reference (endId/end/to)".to_string(),
    })?;

    let raw_waypoints = WAYPOINT_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_array)
        .ok_or_else(|| MaptraceError::DocumentInvalid {
            reason: "missing waypoint array (waypoints/points/markers)".to_string(),
        })?;

    let mut waypoints = Vec::with_capacity(raw_waypoints.len());
    for (position, raw) in raw_waypoints.iter().enumerate() {
        waypoints.push(parse_waypoint(raw, position)?);
    }
    waypoints.sort_by_key(|w: &Waypoint| w.index);

    Ok(Route { start_id, end_id, waypoints })
}

fn parse_waypoint(value: &Value, position: usize) -> Result<Waypoint> {
    let object = value.as_object().ok_or_else(|| MaptraceError::DocumentInvalid {
        reason: format!("waypoint {} is not an object", position),
    })?;

    // Nested pixel object, or flat x/y on the waypoint itself.
    let (x, y) = if let Some(pixel) = object.get("pixel").and_then(Value::as_object) {
        (number(pixel.get("x")), number(pixel.get("y")))
    } else {
        (number(object.get("x")), number(object.get("y")))
    };

    let (x, y) = match (x, y) {
        (Some(x), Some(y)) => (x, y),
        _ => {
            return Err(MaptraceError::DocumentInvalid {
                reason: format!("waypoint {} has no pixel coordinates", position),
            })
        }
    };

    let index = match object.get("index").and_then(Value::as_u64) {
        Some(index) => u32::try_from(index).map_err(|_| MaptraceError::DocumentInvalid {
            reason: format!("waypoint {} index {} is out of range", position, index),
        })?,
        None => {
            tracing::debug!(position, "waypoint missing index, assigning position + 1");
            position as u32 + 1
        }
    };

    Ok(Waypoint::new(index, PixelPoint::new(x, y)))
}

fn first_string(object: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_document() {
        let doc = json!({
            "startId": "gate",
            "endId": "summit",
            "waypoints": [
                { "index": 2, "pixel": { "x": 20.0, "y": 21.0 } },
                { "index": 1, "pixel": { "x": 10.0, "y": 11.0 } },
            ]
        });

        let route = parse_route(&doc).unwrap();
        assert_eq!(route.start_id, "gate");
        assert_eq!(route.end_id, "summit");
        // Sorted by index on load
        assert_eq!(route.waypoints[0].pixel.x, 10.0);
        assert_eq!(route.waypoints[1].pixel.x, 20.0);
    }

    #[test]
    fn test_legacy_points_and_from_to() {
        let doc = json!({
            "from": "trailhead",
            "to": "lake",
            "points": [
                { "x": 5.5, "y": 6.5 },
                { "x": 7.5, "y": 8.5 },
            ]
        });

        let route = parse_route(&doc).unwrap();
        assert_eq!(route.start_id, "trailhead");
        assert_eq!(route.end_id, "lake");
        // Missing indices become position + 1
        assert_eq!(route.waypoints[0].index, 1);
        assert_eq!(route.waypoints[1].index, 2);
        assert_eq!(route.waypoints[1].pixel.y, 8.5);
    }

    #[test]
    fn test_legacy_markers_variant() {
        let doc = json!({
            "start": "a",
            "end": "b",
            "markers": [
                { "index": 7, "x": 1.0, "y": 2.0 },
            ]
        });

        let route = parse_route(&doc).unwrap();
        assert_eq!(route.waypoints.len(), 1);
        // Sparse tags are kept, not renumbered
        assert_eq!(route.waypoints[0].index, 7);
    }

    #[test]
    fn test_waypoint_index_out_of_range() {
        let doc = json!({
            "startId": "a",
            "endId": "b",
            "waypoints": [ { "index": 4_294_967_296u64, "x": 1.0, "y": 2.0 } ]
        });
        let err = parse_route(&doc).unwrap_err();
        // Not silently truncated into a small tag
        assert!(matches!(err, MaptraceError::DocumentInvalid { .. }));
    }

    #[test]
    fn test_missing_waypoint_array() {
        let doc = json!({ "startId": "a", "endId": "b" });
        let err = parse_route(&doc).unwrap_err();
        assert!(matches!(err, MaptraceError::DocumentInvalid { .. }));
    }

    #[test]
    fn test_missing_endpoints() {
        let doc = json!({ "waypoints": [] });
        assert!(parse_route(&doc).is_err());
    }

    #[test]
    fn test_waypoint_without_coordinates() {
        let doc = json!({
            "startId": "a",
            "endId": "b",
            "waypoints": [ { "index": 1 } ]
        });
        let err = parse_route(&doc).unwrap_err();
        assert!(matches!(err, MaptraceError::DocumentInvalid { .. }));
    }

    #[test]
    fn test_file_round_trip_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.json");

        let doc = json!({
            "from": "gate",
            "to": "summit",
            "points": [ { "x": 3.0, "y": 4.0 } ]
        });
        std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

        let route = read_route(&path).unwrap();
        write_route(&path, &route).unwrap();

        // Rewritten file uses canonical keys only.
        let rewritten = std::fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains("start_id"));
        assert!(rewritten.contains("waypoints"));
        assert!(!rewritten.contains("\"from\""));

        let reread = read_route(&path).unwrap();
        assert_eq!(route, reread);
    }
}
