//! GeoJSON feature source and wire formatting of query results.
//!
//! Input: a FeatureCollection of `LineString` / `MultiLineString` waterways.
//! Output: each crossing's intersection as a GeoJSON geometry, and the full
//! response document sent back by the HTTP boundary.

use crate::config::Config;
use crate::engine::{Crossing, CrossingGeometry};
use crate::error::{Result, WaterwayError};
use crate::query::QueryResult;
use geo::{Coord, LineString};
use geojson::{Feature, GeoJson, Geometry, Value, feature::Id};
use serde_json::{Map, json};
use std::path::Path;
use wasserwege_types::feature::FeatureRecord;

/// Category used when a feature has no type property.
pub const DEFAULT_KIND: &str = "waterway";

const NAME_KEYS: [&str; 2] = ["waterway_name", "name"];
const KIND_KEYS: [&str; 2] = ["waterway_type", "waterway"];

/// Records parsed from a FeatureCollection.
#[derive(Debug, Default)]
pub struct ParsedFeatures {
    pub records: Vec<FeatureRecord>,
    /// Features with an unsupported geometry or without a usable id
    pub rejected: Vec<WaterwayError>,
}

fn position_to_coord(position: &[f64]) -> Result<Coord> {
    if position.len() < 2 {
        return Err(WaterwayError::InvalidInput(
            "Position must have at least 2 coordinates".to_string(),
        ));
    }
    Ok(Coord {
        x: position[0],
        y: position[1],
    })
}

fn line_from_positions(positions: &[Vec<f64>]) -> Result<LineString<f64>> {
    positions
        .iter()
        .map(|p| position_to_coord(p))
        .collect::<Result<Vec<_>>>()
        .map(LineString::new)
}

type Properties = Map<String, serde_json::Value>;

fn feature_id(feature: &Feature, properties: Option<&Properties>) -> Result<i64> {
    let from_value = |value: &serde_json::Value| match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    };

    let id = match &feature.id {
        Some(Id::Number(n)) => n.as_i64(),
        Some(Id::String(s)) => s.parse().ok(),
        None => properties.and_then(|p| p.get("id")).and_then(from_value),
    };

    id.ok_or_else(|| WaterwayError::InvalidInput("Feature has no integer id".to_string()))
}

fn string_property(properties: Option<&Properties>, keys: &[&str]) -> Option<String> {
    let properties = properties?;
    keys.iter()
        .filter_map(|k| properties.get(*k))
        .find_map(|v| v.as_str())
        .map(str::to_owned)
}

/// Converts one GeoJSON feature into a record.
pub fn record_from_feature(feature: &Feature) -> Result<FeatureRecord> {
    let properties = feature.properties.as_ref();
    let id = feature_id(feature, properties)?;

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| WaterwayError::InvalidInput(format!("Feature {} has no geometry", id)))?;

    let parts = match &geometry.value {
        Value::LineString(positions) => vec![line_from_positions(positions)?],
        Value::MultiLineString(lines) => lines
            .iter()
            .map(|l| line_from_positions(l))
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(WaterwayError::InvalidInput(format!(
                "Feature {} is not a LineString or MultiLineString",
                id
            )));
        }
    };

    Ok(FeatureRecord {
        id,
        name: string_property(properties, &NAME_KEYS),
        kind: string_property(properties, &KIND_KEYS).unwrap_or_else(|| DEFAULT_KIND.to_string()),
        parts,
    })
}

/// Parses a FeatureCollection into records, skipping unusable features.
///
/// # Examples
///
/// ```
/// use wasserwege::geojson::parse_feature_collection;
///
/// let text = r#"{
///   "type": "FeatureCollection",
///   "features": [{
///     "type": "Feature",
///     "id": 42,
///     "properties": {"waterway_name": "Isar", "waterway_type": "river"},
///     "geometry": {"type": "LineString", "coordinates": [[11.5, 48.1], [11.6, 48.2]]}
///   }]
/// }"#;
/// let parsed = parse_feature_collection(text)?;
/// assert_eq!(parsed.records[0].id, 42);
/// assert_eq!(parsed.records[0].name.as_deref(), Some("Isar"));
/// # Ok::<(), wasserwege::WaterwayError>(())
/// ```
pub fn parse_feature_collection(text: &str) -> Result<ParsedFeatures> {
    let collection = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(WaterwayError::InvalidInput(
                "GeoJSON document is not a FeatureCollection".to_string(),
            ));
        }
    };

    let mut parsed = ParsedFeatures::default();
    for (idx, feature) in collection.features.iter().enumerate() {
        match record_from_feature(feature) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                log::warn!("Skipping GeoJSON feature {}: {}", idx, e);
                parsed.rejected.push(e);
            }
        }
    }

    Ok(parsed)
}

pub fn read_feature_collection<P: AsRef<Path>>(path: P) -> Result<ParsedFeatures> {
    let text = std::fs::read_to_string(path)?;
    parse_feature_collection(&text)
}

fn position(c: &Coord) -> Vec<f64> {
    vec![c.x, c.y]
}

fn line_positions(line: &LineString<f64>) -> Vec<Vec<f64>> {
    line.0.iter().map(position).collect()
}

/// Converts an intersection into the matching GeoJSON geometry.
///
/// One point is a `Point`, several a `MultiPoint`; one line a `LineString`,
/// several a `MultiLineString`; points mixed with lines a
/// `GeometryCollection`. `None` for an empty intersection.
pub fn intersection_to_geometry(geometry: &CrossingGeometry) -> Option<Geometry> {
    let points = match geometry.points.as_slice() {
        [] => None,
        [p] => Some(Value::Point(position(p))),
        many => Some(Value::MultiPoint(many.iter().map(position).collect())),
    };

    let lines = match geometry.lines.as_slice() {
        [] => None,
        [l] => Some(Value::LineString(line_positions(l))),
        many => Some(Value::MultiLineString(many.iter().map(line_positions).collect())),
    };

    match (points, lines) {
        (None, None) => None,
        (Some(v), None) | (None, Some(v)) => Some(Geometry::new(v)),
        (Some(p), Some(l)) => Some(Geometry::new(Value::GeometryCollection(vec![
            Geometry::new(p),
            Geometry::new(l),
        ]))),
    }
}

/// One crossing as a JSON object: id, name, type and intersection.
pub fn crossing_to_json(crossing: &Crossing, unnamed_label: &str) -> Result<serde_json::Value> {
    let intersection = match intersection_to_geometry(&crossing.intersection) {
        Some(geometry) => serde_json::to_value(&geometry)?,
        None => serde_json::Value::Null,
    };

    Ok(json!({
        "id": crossing.feature_id,
        "name": crossing.name.as_deref().unwrap_or(unnamed_label),
        "type": crossing.kind,
        "intersection": intersection,
    }))
}

/// The response document for one query.
///
/// `intersection_length` is used for ordering only and is not included.
pub fn format_response(result: &QueryResult, config: &Config) -> Result<serde_json::Value> {
    let crossings = result
        .crossings
        .iter()
        .map(|c| crossing_to_json(c, &config.unnamed_label))
        .collect::<Result<Vec<_>>>()?;

    Ok(json!({
        "crossings": crossings,
        "total_crossings": result.crossings.len(),
        "processing_times_ms": {
            "prune": result.timings.prune_ms,
            "intersect": result.timings.intersect_ms,
            "sort": result.timings.sort_ms,
            "total": result.timings.total_ms(),
        },
    }))
}
