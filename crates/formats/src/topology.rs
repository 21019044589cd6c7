//! Compact topology (TopoJSON) decoding.
//!
//! A topology stores shared boundaries once as `arcs`; polygons reference arcs
//! by index (a negative index `!i` means arc `i` reversed). When a `transform`
//! is present, arc positions are quantized and delta-encoded per arc.

use std::collections::BTreeMap;

use foundation::GeoPoint;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::{Map, Value};
use tracing::debug;

use crate::boundary::{
    BoundaryFeature, BoundaryGeometry, FeatureCollection, INVALID_GEOMETRY_KIND, Ring,
};

#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a Topology document, got {0:?}")]
    NotATopology(String),
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    #[error("arc index {index} out of range ({len} arcs)")]
    ArcOutOfRange { index: i64, len: usize },
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

/// One geometry object of a topology.
///
/// Members with a null or unknown `type`, or with arcs that do not fit the
/// expected nesting, deserialize as `Other` instead of failing the document.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TopoGeometry {
    Shape(TopoShape),
    Other(IgnoredAny),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum TopoShape {
    GeometryCollection {
        #[serde(default)]
        geometries: Vec<TopoGeometry>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
        #[serde(default)]
        id: Option<Value>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
        #[serde(default)]
        id: Option<Value>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
        #[serde(default)]
        id: Option<Value>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub transform: Option<Transform>,
    #[serde(default)]
    pub objects: BTreeMap<String, TopoGeometry>,
    #[serde(default)]
    pub arcs: Vec<Vec<Vec<f64>>>,
}

impl Topology {
    pub fn parse(payload: &str) -> Result<Self, TopologyError> {
        let topo: Topology = serde_json::from_str(payload)?;
        if topo.kind != "Topology" {
            return Err(TopologyError::NotATopology(topo.kind));
        }
        Ok(topo)
    }

    /// Decode every arc into absolute positions.
    pub fn decode_arcs(&self) -> Vec<Vec<GeoPoint>> {
        self.arcs
            .iter()
            .map(|arc| decode_arc(arc, self.transform))
            .collect()
    }

    /// Convert the named object into boundary features.
    ///
    /// A `GeometryCollection` yields one feature per member; any other object
    /// yields a single feature. Members referencing missing arcs are kept with
    /// [`INVALID_GEOMETRY_KIND`].
    pub fn feature_collection(&self, object: &str) -> Result<FeatureCollection, TopologyError> {
        let geom = self
            .objects
            .get(object)
            .ok_or_else(|| TopologyError::MissingObject(object.to_string()))?;
        let arcs = self.decode_arcs();

        let features = match geom {
            TopoGeometry::Shape(TopoShape::GeometryCollection { geometries, .. }) => {
                geometries.iter().map(|g| to_feature(g, &arcs)).collect()
            }
            other => vec![to_feature(other, &arcs)],
        };
        Ok(FeatureCollection::new(features))
    }
}

/// Parse a topology payload and extract `object` as a feature collection.
pub fn extract_features(payload: &str, object: &str) -> Result<FeatureCollection, TopologyError> {
    Topology::parse(payload)?.feature_collection(object)
}

fn decode_arc(arc: &[Vec<f64>], transform: Option<Transform>) -> Vec<GeoPoint> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for pos in arc {
        let (px, py) = match pos.as_slice() {
            [px, py, ..] => (*px, *py),
            _ => continue,
        };
        match transform {
            Some(t) => {
                x += px;
                y += py;
                out.push(GeoPoint::new(
                    x * t.scale[0] + t.translate[0],
                    y * t.scale[1] + t.translate[1],
                ));
            }
            None => out.push(GeoPoint::new(px, py)),
        }
    }
    out
}

fn stitch_ring(indices: &[i64], arcs: &[Vec<GeoPoint>]) -> Result<Ring, TopologyError> {
    let mut ring: Ring = Vec::new();
    for &index in indices {
        let resolved = if index < 0 { !index } else { index };
        let arc = usize::try_from(resolved)
            .ok()
            .and_then(|i| arcs.get(i))
            .ok_or(TopologyError::ArcOutOfRange {
                index,
                len: arcs.len(),
            })?;
        // Consecutive arcs share their joining position.
        ring.pop();
        if index < 0 {
            ring.extend(arc.iter().rev().copied());
        } else {
            ring.extend(arc.iter().copied());
        }
    }
    if ring.len() < 4 {
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
    }
    Ok(ring)
}

fn stitch_polygon(rings: &[Vec<i64>], arcs: &[Vec<GeoPoint>]) -> Result<Vec<Ring>, TopologyError> {
    rings.iter().map(|r| stitch_ring(r, arcs)).collect()
}

fn to_feature(geom: &TopoGeometry, arcs: &[Vec<GeoPoint>]) -> BoundaryFeature {
    let TopoGeometry::Shape(shape) = geom else {
        return BoundaryFeature::new(
            None,
            Map::new(),
            BoundaryGeometry::Unsupported {
                kind: "unsupported".to_string(),
            },
        );
    };
    let (geometry, properties, id) = match shape {
        TopoShape::Polygon {
            arcs: rings,
            properties,
            id,
        } => (
            stitch_polygon(rings, arcs).map(BoundaryGeometry::Polygon),
            properties,
            id,
        ),
        TopoShape::MultiPolygon {
            arcs: polys,
            properties,
            id,
        } => (
            polys
                .iter()
                .map(|p| stitch_polygon(p, arcs))
                .collect::<Result<Vec<_>, _>>()
                .map(BoundaryGeometry::MultiPolygon),
            properties,
            id,
        ),
        TopoShape::GeometryCollection { properties, id, .. } => (
            Ok(BoundaryGeometry::Unsupported {
                kind: "GeometryCollection".to_string(),
            }),
            properties,
            id,
        ),
    };

    let id = match id {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let geometry = geometry.unwrap_or_else(|err| {
        debug!(id = ?id, %err, "skipping unreadable topology geometry");
        BoundaryGeometry::Unsupported {
            kind: INVALID_GEOMETRY_KIND.to_string(),
        }
    });
    BoundaryFeature::new(id, properties.clone().unwrap_or_default(), geometry)
}

#[cfg(test)]
mod tests {
    use super::{TopologyError, extract_features};
    use crate::boundary::{BoundaryGeometry, INVALID_GEOMETRY_KIND};
    use foundation::GeoPoint;
    use pretty_assertions::assert_eq;

    // Quantized with scale 1 and translate (-1, -1).
    const LAND: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [1, 1], "translate": [-1, -1] },
        "objects": {
            "land": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "arcs": [[0, 1]], "properties": { "name": "West" } },
                    { "type": "MultiPolygon", "arcs": [[[-1, 2]]] },
                    { "type": "LineString", "arcs": [0] }
                ]
            }
        },
        "arcs": [
            [[2, 1], [0, 1], [-1, 0], [0, -1]],
            [[1, 1], [1, 0]],
            [[2, 1], [1, 0], [0, 1], [-1, 0]]
        ]
    }"#;

    fn pts(v: &[(f64, f64)]) -> Vec<GeoPoint> {
        v.iter().map(|&(x, y)| GeoPoint::new(x, y)).collect()
    }

    #[test]
    fn decodes_delta_encoded_arcs() {
        let fc = extract_features(LAND, "land").expect("extract");
        assert_eq!(fc.len(), 3);
        assert_eq!(fc.features[0].name, "West");
        assert_eq!(
            fc.features[0].geometry,
            BoundaryGeometry::Polygon(vec![pts(&[
                (1.0, 0.0),
                (1.0, 1.0),
                (0.0, 1.0),
                (0.0, 0.0),
                (1.0, 0.0),
            ])])
        );
    }

    #[test]
    fn reversed_arcs_are_walked_backwards() {
        let fc = extract_features(LAND, "land").expect("extract");
        let BoundaryGeometry::MultiPolygon(polys) = &fc.features[1].geometry else {
            panic!("expected multipolygon");
        };
        assert_eq!(
            polys[0][0],
            pts(&[
                (0.0, 0.0),
                (0.0, 1.0),
                (1.0, 1.0),
                (1.0, 0.0),
                (2.0, 0.0),
                (2.0, 1.0),
                (1.0, 1.0),
            ])
        );
        assert_eq!(fc.features[1].name, "Unknown");
    }

    #[test]
    fn non_area_members_become_unsupported() {
        let fc = extract_features(LAND, "land").expect("extract");
        assert!(!fc.features[2].geometry.is_area());
        assert_eq!(fc.area_count(), 2);
    }

    #[test]
    fn missing_object_and_wrong_type_fail() {
        assert!(matches!(
            extract_features(LAND, "countries"),
            Err(TopologyError::MissingObject(name)) if name == "countries"
        ));
        assert!(matches!(
            extract_features(r#"{"type":"FeatureCollection","features":[]}"#, "land"),
            Err(TopologyError::NotATopology(_))
        ));
    }

    #[test]
    fn out_of_range_arc_only_drops_its_member() {
        let payload = r#"{"type":"Topology","objects":{"land":{
            "type":"GeometryCollection","geometries":[
            {"type":"Polygon","arcs":[[0]],"properties":{"name":"Kept"}},
            {"type":"MultiPolygon","arcs":[[[7]]],"properties":{"name":"Dangling"}}
        ]}},"arcs":[[[0,0],[1,0],[1,1],[0,0]]]}"#;
        let fc = extract_features(payload, "land").expect("extract");
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.area_count(), 1);
        assert_eq!(fc.features[0].name, "Kept");
        assert_eq!(
            fc.features[1].geometry,
            BoundaryGeometry::Unsupported { kind: INVALID_GEOMETRY_KIND.to_string() }
        );
        assert_eq!(fc.features[1].name, "Dangling");
    }

    #[test]
    fn null_and_malformed_members_become_unsupported() {
        let payload = r#"{"type":"Topology","objects":{"land":{
            "type":"GeometryCollection","geometries":[
            {"type":"Polygon","arcs":[[0]]},
            {"type":null},
            {"type":"Polygon","arcs":"oops"}
        ]}},"arcs":[[[0,0],[1,0],[1,1],[0,0]]]}"#;
        let fc = extract_features(payload, "land").expect("extract");
        assert_eq!(fc.len(), 3);
        assert!(fc.features[0].geometry.is_area());
        assert!(!fc.features[1].geometry.is_area());
        assert!(!fc.features[2].geometry.is_area());
    }

    #[test]
    fn null_object_extracts_nothing_usable() {
        let payload = r#"{"type":"Topology","objects":{"land":{"type":null}},"arcs":[]}"#;
        let fc = extract_features(payload, "land").expect("extract");
        assert_eq!(fc.area_count(), 0);
    }
}
