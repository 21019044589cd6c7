//! World geography sources: where to fetch land polygons and how to decode them.

use formats::{BoundaryParseError, FeatureCollection, TopologyError, extract_features};
use serde::Deserialize;

use crate::fetch::FetchError;

pub const HOLTZY_WORLD_GEOJSON: &str =
    "https://raw.githubusercontent.com/holtzy/D3-graph-gallery/master/DATA/world.geojson";
pub const JSDELIVR_LAND_110M: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/land-110m.json";
pub const UNPKG_LAND_110M: &str = "https://unpkg.com/world-atlas@2/land-110m.json";

/// Topology object holding the land polygons in the world-atlas files.
pub const DEFAULT_TOPOLOGY_OBJECT: &str = "land";

/// Environment variable overriding the source list (`format:url`, comma separated).
pub const SOURCES_ENV_VAR: &str = "GLOBE_SOURCES";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum SourceFormat {
    /// A GeoJSON `FeatureCollection`.
    GeoJson,
    /// A compact topology; `object` names the member holding the polygons.
    TopoJson {
        #[serde(default = "default_object")]
        object: String,
    },
}

fn default_object() -> String {
    DEFAULT_TOPOLOGY_OBJECT.to_string()
}

impl SourceFormat {
    pub fn topology(object: &str) -> Self {
        SourceFormat::TopoJson {
            object: object.to_string(),
        }
    }

    /// Normalize a fetched payload into boundary features.
    pub fn decode(&self, payload: &str) -> Result<FeatureCollection, SourceError> {
        let features = match self {
            SourceFormat::GeoJson => FeatureCollection::from_geojson_str(payload)?,
            SourceFormat::TopoJson { object } => extract_features(payload, object)?,
        };
        if features.area_count() == 0 {
            return Err(SourceError::Empty);
        }
        Ok(features)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::GeoJson => write!(f, "geojson"),
            SourceFormat::TopoJson { object } => write!(f, "topojson@{object}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldSource {
    pub url: String,
    #[serde(flatten)]
    pub format: SourceFormat,
}

impl WorldSource {
    pub fn new(url: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            url: url.into(),
            format,
        }
    }

    pub fn geojson(url: impl Into<String>) -> Self {
        Self::new(url, SourceFormat::GeoJson)
    }

    pub fn topojson(url: impl Into<String>, object: &str) -> Self {
        Self::new(url, SourceFormat::topology(object))
    }
}

/// The built-in fallback order: one feature collection, then two mirrors of
/// the same land topology.
pub fn default_sources() -> Vec<WorldSource> {
    vec![
        WorldSource::geojson(HOLTZY_WORLD_GEOJSON),
        WorldSource::topojson(JSDELIVR_LAND_110M, DEFAULT_TOPOLOGY_OBJECT),
        WorldSource::topojson(UNPKG_LAND_110M, DEFAULT_TOPOLOGY_OBJECT),
    ]
}

/// Why a single source was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid feature collection: {0}")]
    FeatureCollection(#[from] BoundaryParseError),
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),
    #[error("payload contains no polygon features")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceListError {
    #[error("source entry {0:?} is missing a `format:` prefix")]
    MissingFormat(String),
    #[error("unknown source format {0:?} (expected geojson or topojson[@object])")]
    UnknownFormat(String),
    #[error("source entry {0:?} has an empty url")]
    EmptyUrl(String),
}

/// Parse a list such as `geojson:https://a/world.json,topojson@land:https://b/land.json`.
///
/// A bare `topojson` prefix reads the `land` object. Blank entries are ignored.
pub fn parse_source_list(list: &str) -> Result<Vec<WorldSource>, SourceListError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_source_entry)
        .collect()
}

fn parse_source_entry(entry: &str) -> Result<WorldSource, SourceListError> {
    let (format, url) = entry
        .split_once(':')
        .ok_or_else(|| SourceListError::MissingFormat(entry.to_string()))?;
    let url = url.trim();
    if url.is_empty() {
        return Err(SourceListError::EmptyUrl(entry.to_string()));
    }
    let format = match format.trim().to_ascii_lowercase().as_str() {
        "geojson" => SourceFormat::GeoJson,
        "topojson" => SourceFormat::topology(DEFAULT_TOPOLOGY_OBJECT),
        other => match other.strip_prefix("topojson@") {
            Some(object) if !object.is_empty() => SourceFormat::topology(object),
            _ => return Err(SourceListError::UnknownFormat(format.to_string())),
        },
    };
    Ok(WorldSource::new(url, format))
}

/// Sources from [`SOURCES_ENV_VAR`] when set and non-empty, else `fallback`.
pub fn sources_from_env(fallback: Vec<WorldSource>) -> Result<Vec<WorldSource>, SourceListError> {
    match std::env::var(SOURCES_ENV_VAR) {
        Ok(value) if !value.trim().is_empty() => parse_source_list(&value),
        _ => Ok(fallback),
    }
}
