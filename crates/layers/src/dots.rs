//! Halftone dot field: land polygons sampled on a regular lon/lat lattice.

use std::sync::Arc;

use formats::{BoundaryFeature, BoundaryGeometry};
use foundation::GeoPoint;
use serde::Deserialize;
use tracing::debug;

use crate::classify::point_in_geometry;
use crate::symbology::is_highlighted_country;

/// Nominal dot spacing; the lattice step is this times [`LATTICE_STEP_FRACTION`].
pub const DEFAULT_DOT_SPACING: f64 = 20.0;
pub const LATTICE_STEP_FRACTION: f64 = 0.1;
/// Alpha every generated dot is painted with.
pub const DEFAULT_DOT_OPACITY: f32 = 0.8;

/// Sampling lattice for dot generation.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Lattice {
    pub spacing: f64,
    pub step_fraction: f64,
}

impl Lattice {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            step_fraction: LATTICE_STEP_FRACTION,
        }
    }

    /// Lattice step in degrees.
    pub fn step_deg(&self) -> f64 {
        self.spacing * self.step_fraction
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new(DEFAULT_DOT_SPACING)
    }
}

/// Lattice points inside `geometry`, longitude-major then latitude.
///
/// Rows start at the bounding-box minimum and advance by whole steps while the
/// coordinate stays within the maximum. A non-positive or non-finite step
/// yields nothing.
pub fn lattice_points(geometry: &BoundaryGeometry, step_deg: f64) -> Vec<GeoPoint> {
    if !(step_deg.is_finite() && step_deg > 0.0) {
        return Vec::new();
    }
    let Some(bounds) = geometry.bounds() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut i = 0u32;
    loop {
        let lon = bounds.min.lon_deg + f64::from(i) * step_deg;
        if lon > bounds.max.lon_deg {
            break;
        }
        let mut j = 0u32;
        loop {
            let lat = bounds.min.lat_deg + f64::from(j) * step_deg;
            if lat > bounds.max.lat_deg {
                break;
            }
            let p = GeoPoint::new(lon, lat);
            if point_in_geometry(p, geometry) {
                out.push(p);
            }
            j += 1;
        }
        i += 1;
    }
    out
}

/// Dot positions for one feature with the default step fraction.
pub fn generate_dots(feature: &BoundaryFeature, spacing: f64) -> Vec<GeoPoint> {
    lattice_points(&feature.geometry, Lattice::new(spacing).step_deg())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dot {
    pub lon_deg: f64,
    pub lat_deg: f64,
    /// Shared by every dot generated from the same feature.
    pub country: Arc<str>,
    pub highlighted: bool,
    pub opacity: f32,
}

impl Dot {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon_deg, self.lat_deg)
    }
}

/// The full, ordered dot collection for one load. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DotField {
    dots: Vec<Dot>,
    highlighted: usize,
}

impl DotField {
    pub fn build(features: &[BoundaryFeature], spacing: f64) -> Self {
        Self::with_lattice(features, Lattice::new(spacing))
    }

    pub fn with_lattice(features: &[BoundaryFeature], lattice: Lattice) -> Self {
        let step = lattice.step_deg();
        let mut dots = Vec::new();
        let mut highlighted = 0usize;
        let mut skipped = 0usize;

        for feature in features {
            if !feature.geometry.is_area() {
                skipped += 1;
                continue;
            }
            let country: Arc<str> = Arc::from(feature.name.as_str());
            let is_target = is_highlighted_country(&feature.name);
            let points = lattice_points(&feature.geometry, step);
            if is_target {
                highlighted += points.len();
            }
            dots.extend(points.into_iter().map(|p| Dot {
                lon_deg: p.lon_deg,
                lat_deg: p.lat_deg,
                country: Arc::clone(&country),
                highlighted: is_target,
                opacity: DEFAULT_DOT_OPACITY,
            }));
        }

        debug!(
            features = features.len(),
            skipped,
            dots = dots.len(),
            highlighted,
            step_deg = step,
            "dot field generated"
        );
        Self { dots, highlighted }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn highlighted_count(&self) -> usize {
        self.highlighted
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dot> {
        self.dots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_DOT_OPACITY, DotField, generate_dots, lattice_points};
    use formats::{BoundaryFeature, BoundaryGeometry, Ring};
    use foundation::GeoPoint;
    use pretty_assertions::assert_eq;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        vec![
            GeoPoint::new(x0, y0),
            GeoPoint::new(x1, y0),
            GeoPoint::new(x1, y1),
            GeoPoint::new(x0, y1),
            GeoPoint::new(x0, y0),
        ]
    }

    #[test]
    fn rectangle_yields_half_open_lattice() {
        // Step 1 over [0, 4]^2: the crossing test keeps columns/rows 0..=3.
        let brazil = BoundaryFeature::named(
            "Brazil",
            BoundaryGeometry::Polygon(vec![square(0.0, 0.0, 4.0, 4.0)]),
        );
        let field = DotField::build(std::slice::from_ref(&brazil), 10.0);
        assert_eq!(field.len(), 16);
        assert_eq!(field.highlighted_count(), 16);
        assert!(field.iter().all(|d| d.highlighted));
        assert!(field.iter().all(|d| &*d.country == "Brazil"));
        assert!(field.iter().all(|d| d.opacity == DEFAULT_DOT_OPACITY));
        assert_eq!(field.dots()[0].position(), GeoPoint::new(0.0, 0.0));
        assert_eq!(field.dots()[1].position(), GeoPoint::new(0.0, 1.0));
        assert_eq!(field.dots()[4].position(), GeoPoint::new(1.0, 0.0));
    }

    #[test]
    fn generation_is_deterministic() {
        let feature = BoundaryFeature::named(
            "Somewhere",
            BoundaryGeometry::MultiPolygon(vec![
                vec![square(-20.0, -10.0, 15.0, 12.0), square(-5.0, -3.0, 5.0, 3.0)],
                vec![square(30.0, 30.0, 41.5, 37.25)],
            ]),
        );
        let a = generate_dots(&feature, 20.0);
        let b = generate_dots(&feature, 20.0);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn holes_are_left_empty() {
        let geom = BoundaryGeometry::Polygon(vec![
            square(0.0, 0.0, 10.0, 10.0),
            square(2.5, 2.5, 7.5, 7.5),
        ]);
        let pts = lattice_points(&geom, 1.0);
        assert!(!pts.is_empty());
        assert!(!pts.iter().any(|p| {
            p.lon_deg > 2.5 && p.lon_deg < 7.5 && p.lat_deg > 2.5 && p.lat_deg < 7.5
        }));
        assert!(pts.contains(&GeoPoint::new(1.0, 1.0)));
    }

    #[test]
    fn non_highlighted_and_unsupported_features() {
        let features = vec![
            BoundaryFeature::named(
                "Brazilia",
                BoundaryGeometry::Polygon(vec![square(0.0, 0.0, 2.0, 2.0)]),
            ),
            BoundaryFeature::named(
                "USA",
                BoundaryGeometry::Unsupported {
                    kind: "Point".to_string(),
                },
            ),
        ];
        let field = DotField::build(&features, 10.0);
        assert_eq!(field.len(), 4);
        assert_eq!(field.highlighted_count(), 0);
        assert!(field.iter().all(|d| !d.highlighted));
    }

    #[test]
    fn invalid_step_produces_nothing() {
        let geom = BoundaryGeometry::Polygon(vec![square(0.0, 0.0, 2.0, 2.0)]);
        assert!(lattice_points(&geom, 0.0).is_empty());
        assert!(lattice_points(&geom, -1.0).is_empty());
        assert!(lattice_points(&geom, f64::NAN).is_empty());
    }
}
