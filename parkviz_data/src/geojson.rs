// Copyright 2025 the Parkviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GeoJSON feature collections.
//!
//! Only what the choropleth needs is read: `Polygon` and `MultiPolygon` geometries and the `name`
//! property used as the join key. Other features are skipped with a warning.

use std::fs;
use std::path::Path;

use log::warn;
use parkviz_charts::{Feature, Geometry, Ring};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::LoadError;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<RawGeometry>,
}

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

fn ring(positions: Vec<Position>) -> Ring {
    positions
        .into_iter()
        .filter_map(|p| match p.as_slice() {
            [lon, lat, ..] => Some((*lon, *lat)),
            _ => None,
        })
        .collect()
}

fn polygon(rings: Vec<Vec<Position>>) -> Vec<Ring> {
    rings.into_iter().map(ring).collect()
}

/// Parses a feature collection.
///
/// Fails when the document is not a feature collection or yields no usable feature.
pub fn parse_features(src: &str) -> Result<Vec<Feature>, LoadError> {
    let collection: FeatureCollection = serde_json::from_str(src)?;
    let total = collection.features.len();
    let features: Vec<Feature> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let name = raw
                .properties
                .as_ref()
                .and_then(|p| p.get("name"))
                .and_then(Value::as_str);
            let Some(name) = name else {
                warn!("skipping feature {i}: no `name` property");
                return None;
            };
            let geometry = match raw.geometry {
                Some(RawGeometry::Polygon { coordinates }) => {
                    Geometry::Polygon(polygon(coordinates))
                }
                Some(RawGeometry::MultiPolygon { coordinates }) => {
                    Geometry::MultiPolygon(coordinates.into_iter().map(polygon).collect())
                }
                Some(RawGeometry::Unsupported) | None => {
                    warn!("skipping feature `{name}`: unsupported geometry");
                    return None;
                }
            };
            Some(Feature::new(name, geometry))
        })
        .collect();
    if features.is_empty() {
        return Err(LoadError::Empty(format!(
            "feature collection ({total} features)"
        )));
    }
    Ok(features)
}

/// Reads and parses a GeoJSON file.
pub fn load_features(path: &Path) -> Result<Vec<Feature>, LoadError> {
    let src = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_features(&src)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VANCOUVER: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Downtown", "mapid": "CBD" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-123.11, 49.28], [-123.10, 49.28], [-123.10, 49.29], [-123.11, 49.28]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-123.2, 49.2, 0.0], [-123.1, 49.2, 0.0], [-123.1, 49.3, 0.0], [-123.2, 49.2, 0.0]]],
                        [[[-123.0, 49.2], [-122.9, 49.2], [-122.9, 49.3], [-123.0, 49.2]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Marker" },
                "geometry": { "type": "Point", "coordinates": [-123.1, 49.25] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [] }
            }
        ]
    }"#;

    #[test]
    fn polygons_and_multipolygons_are_kept() {
        let features = parse_features(VANCOUVER).unwrap();
        let names: Vec<&str> = features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["Downtown", "Islands"]);
        let Geometry::MultiPolygon(parts) = &features[1].geometry else {
            panic!("expected a multipolygon");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0][0][1], (-123.1, 49.2), "altitude is dropped");
    }

    #[test]
    fn collections_without_usable_features_fail() {
        let src = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(parse_features(src), Err(LoadError::Empty(_))));
        assert!(matches!(parse_features("{"), Err(LoadError::Json(_))));
    }
}
