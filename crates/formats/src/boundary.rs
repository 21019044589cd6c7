use foundation::{GeoBounds, GeoPoint};
use serde_json::{Map, Value};
use tracing::debug;

use crate::country::resolve_country_name;

/// Closed ring of positions; the closing point may or may not be repeated.
pub type Ring = Vec<GeoPoint>;

/// `Unsupported` kind recorded for geometry whose coordinates could not be read.
pub const INVALID_GEOMETRY_KIND: &str = "invalid";

/// Area geometry of a boundary feature.
///
/// Polygon rings are `[outer, hole, hole, ...]`. Anything that is not an area
/// is kept as `Unsupported` so callers can skip it without failing the load.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    Unsupported { kind: String },
}

impl BoundaryGeometry {
    pub fn is_area(&self) -> bool {
        !matches!(self, BoundaryGeometry::Unsupported { .. })
    }

    /// Constituent polygons as ring slices (one for `Polygon`, none for `Unsupported`).
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            BoundaryGeometry::Polygon(rings) => vec![rings.as_slice()],
            BoundaryGeometry::MultiPolygon(polys) => polys.iter().map(Vec::as_slice).collect(),
            BoundaryGeometry::Unsupported { .. } => Vec::new(),
        }
    }

    /// Planar bounds of all outer rings.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.polygons()
            .into_iter()
            .filter_map(|rings| rings.first())
            .filter_map(|outer| GeoBounds::from_points(outer))
            .reduce(GeoBounds::union)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub id: Option<String>,
    /// Country name resolved from the properties at construction.
    pub name: String,
    pub properties: Map<String, Value>,
    pub geometry: BoundaryGeometry,
}

impl BoundaryFeature {
    pub fn new(
        id: Option<String>,
        properties: Map<String, Value>,
        geometry: BoundaryGeometry,
    ) -> Self {
        Self {
            id,
            name: resolve_country_name(&properties),
            properties,
            geometry,
        }
    }

    /// Feature with only a display name, mostly for fixtures.
    pub fn named(name: &str, geometry: BoundaryGeometry) -> Self {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(name.to_string()));
        Self::new(None, properties, geometry)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug, thiserror::Error)]
pub enum BoundaryParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("invalid feature at index {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },
}

impl FeatureCollection {
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Number of features with polygon or multipolygon geometry.
    pub fn area_count(&self) -> usize {
        self.features.iter().filter(|f| f.geometry.is_area()).count()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryParseError> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_geojson_value(&value)
    }

    /// Only the document shape and feature envelopes are fatal; a feature whose
    /// geometry cannot be read is kept with [`INVALID_GEOMETRY_KIND`].
    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryParseError> {
        let entries = match (value.get("type").and_then(Value::as_str), value.get("features")) {
            (Some("FeatureCollection"), Some(Value::Array(entries))) => entries,
            _ => return Err(BoundaryParseError::NotAFeatureCollection),
        };
        let features = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                parse_feature(index, entry)
                    .map_err(|reason| BoundaryParseError::InvalidFeature { index, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { features })
    }
}

fn parse_feature(index: usize, entry: &Value) -> Result<BoundaryFeature, String> {
    if !entry.is_object() {
        return Err("feature must be an object".to_string());
    }
    match entry.get("type").and_then(Value::as_str) {
        Some("Feature") => {}
        Some(other) => return Err(format!("unexpected feature type: {other}")),
        None => return Err("feature missing type".to_string()),
    }
    // Numeric ids (ISO 3166 numeric codes in world files) are kept as text.
    let id = match entry.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let properties = entry
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let geometry = match entry.get("geometry") {
        None | Some(Value::Null) => BoundaryGeometry::Unsupported {
            kind: "null".to_string(),
        },
        Some(g) => parse_geometry(g).unwrap_or_else(|reason| {
            debug!(index, %reason, "skipping unreadable feature geometry");
            BoundaryGeometry::Unsupported {
                kind: INVALID_GEOMETRY_KIND.to_string(),
            }
        }),
    };
    Ok(BoundaryFeature::new(id, properties, geometry))
}

fn parse_geometry(value: &Value) -> Result<BoundaryGeometry, String> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry missing type")?;
    let coordinates = || value.get("coordinates").ok_or("geometry missing coordinates");
    match kind {
        "Polygon" => Ok(BoundaryGeometry::Polygon(nested(
            coordinates()?,
            "Polygon rings",
            parse_ring,
        )?)),
        "MultiPolygon" => Ok(BoundaryGeometry::MultiPolygon(nested(
            coordinates()?,
            "MultiPolygon members",
            |poly| nested(poly, "Polygon rings", parse_ring),
        )?)),
        other => Ok(BoundaryGeometry::Unsupported {
            kind: other.to_string(),
        }),
    }
}

/// Apply `item` to every element of a JSON array named `what` in errors.
fn nested<T>(
    value: &Value,
    what: &str,
    item: impl Fn(&Value) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    value
        .as_array()
        .ok_or_else(|| format!("{what} must be an array"))?
        .iter()
        .map(item)
        .collect()
}

fn parse_ring(value: &Value) -> Result<Ring, String> {
    nested(value, "ring", |position| match position.as_array().map(Vec::as_slice) {
        Some([lon, lat, ..]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
            _ => Err("position components must be numbers".to_string()),
        },
        _ => Err("position must be [lon, lat]".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::{BoundaryGeometry, BoundaryParseError, FeatureCollection, INVALID_GEOMETRY_KIND};
    use foundation::GeoPoint;
    use pretty_assertions::assert_eq;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 76,
                "properties": { "name": "Brazil" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-50, -10], [-40, -10], [-40, 0], [-50, 0], [-50, -10]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Islands" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 0], [1, 0], [1, 1], [0, 0]]],
                        [[[5, 5], [6, 5], [6, 7], [5, 5]]]
                    ]
                }
            },
            { "type": "Feature", "properties": {}, "geometry": { "type": "Point", "coordinates": [1, 2] } },
            { "type": "Feature", "properties": {}, "geometry": null }
        ]
    }"#;

    #[test]
    fn parses_world_polygons() {
        let fc = FeatureCollection::from_geojson_str(WORLD).expect("parse");
        assert_eq!(fc.len(), 4);
        assert_eq!(fc.area_count(), 2);
        assert_eq!(fc.features[0].id.as_deref(), Some("76"));
        assert_eq!(fc.features[0].name, "Brazil");
        assert_eq!(fc.features[1].name, "Islands");
        assert_eq!(fc.features[2].name, "Unknown");
        assert_eq!(
            fc.features[2].geometry,
            BoundaryGeometry::Unsupported { kind: "Point".to_string() }
        );
        assert_eq!(
            fc.features[3].geometry,
            BoundaryGeometry::Unsupported { kind: "null".to_string() }
        );
    }

    #[test]
    fn multipolygon_bounds_cover_every_part() {
        let fc = FeatureCollection::from_geojson_str(WORLD).expect("parse");
        let b = fc.features[1].geometry.bounds().expect("bounds");
        assert_eq!(b.min, GeoPoint::new(0.0, 0.0));
        assert_eq!(b.max, GeoPoint::new(6.0, 7.0));
        assert!(fc.features[2].geometry.bounds().is_none());
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureCollection::from_geojson_str(r#"{"type":"Topology"}"#).unwrap_err();
        assert!(matches!(err, BoundaryParseError::NotAFeatureCollection));

        let err = FeatureCollection::from_geojson_str("not json").unwrap_err();
        assert!(matches!(err, BoundaryParseError::Json(_)));
    }

    #[test]
    fn reports_bad_feature_envelope_with_index() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":null},
            {"type":"Point","coordinates":[0,0]}
        ]}"#;
        let err = FeatureCollection::from_geojson_str(payload).unwrap_err();
        assert!(matches!(err, BoundaryParseError::InvalidFeature { index: 1, .. }));
    }

    #[test]
    fn unreadable_geometry_keeps_the_rest_of_the_collection() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"Brazil"},
             "geometry":{"type":"Polygon","coordinates":[[[-50,-10],[-40,-10],[-40,0],[-50,-10]]]}},
            {"type":"Feature","properties":{"name":"Broken"},
             "geometry":{"type":"Polygon","coordinates":[[[1]]]}},
            {"type":"Feature","properties":{"name":"Typo"},
             "geometry":{"type":"MultiPolygon","coordinates":[[[[0,"x"]]]]}}
        ]}"#;
        let fc = FeatureCollection::from_geojson_str(payload).expect("parse");
        assert_eq!(fc.len(), 3);
        assert_eq!(fc.area_count(), 1);
        assert_eq!(fc.features[0].name, "Brazil");
        assert_eq!(fc.features[1].name, "Broken");
        for feature in &fc.features[1..] {
            assert_eq!(
                feature.geometry,
                BoundaryGeometry::Unsupported { kind: INVALID_GEOMETRY_KIND.to_string() }
            );
        }
    }
}
