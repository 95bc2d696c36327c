//! Coordinate and boundary normalization.
//!
//! Client payloads and historical ledger snapshots carry boundary polygons
//! in heterogeneous shapes: `[lat, lng]` pairs, `{lat, lng}` objects with
//! several accepted key spellings, numbers or numeric strings. This module
//! folds all of them into one canonical form before anything is persisted,
//! so the write path and the rollback reconciler agree on what a boundary
//! looks like.

use serde::{Deserialize, Serialize};

/// A single canonical boundary vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Coerce a JSON value to `f64`.
///
/// Accepts JSON numbers and numeric strings; everything else fails.
pub fn coerce_f64(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse one boundary element into a [`GeoPoint`].
///
/// Accepted shapes:
/// - a 2-element ordered pair `[lat, lng]`
/// - an object exposing `lat`/`latitude` and `lng`/`longitude`/`lon`
fn parse_point(element: &serde_json::Value) -> Option<GeoPoint> {
    match element {
        serde_json::Value::Array(pair) if pair.len() == 2 => {
            let lat = coerce_f64(&pair[0])?;
            let lng = coerce_f64(&pair[1])?;
            Some(GeoPoint { lat, lng })
        }
        serde_json::Value::Object(map) => {
            let lat = map
                .get("lat")
                .or_else(|| map.get("latitude"))
                .and_then(coerce_f64)?;
            let lng = map
                .get("lng")
                .or_else(|| map.get("longitude"))
                .or_else(|| map.get("lon"))
                .and_then(coerce_f64)?;
            Some(GeoPoint { lat, lng })
        }
        _ => None,
    }
}

/// Normalize raw boundary input into an ordered canonical point list.
///
/// Elements that fail to coerce are dropped; if nothing survives (or the
/// input is not an array at all), the result is `None`. An empty historical
/// polygon (`[]`) and an absent one (`null`) therefore normalize the same
/// way: no boundary.
pub fn normalize_boundary(raw: &serde_json::Value) -> Option<Vec<GeoPoint>> {
    let elements = raw.as_array()?;
    let points: Vec<GeoPoint> = elements.iter().filter_map(parse_point).collect();
    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}
