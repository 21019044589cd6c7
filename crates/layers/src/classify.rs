//! Even-odd point-in-polygon tests in planar lon/lat space.
//!
//! Known limitation: a point lying exactly on a ring edge or vertex has no
//! defined answer. With the crossing test used here, points on a left or
//! bottom edge of an axis-aligned ring usually count as inside and points on a
//! right or top edge as outside, but callers must not depend on it.

use formats::{BoundaryFeature, BoundaryGeometry, Ring};
use foundation::GeoPoint;

/// Ray-casting test against one ring; closure is implicit.
pub fn point_in_ring(point: GeoPoint, ring: &[GeoPoint]) -> bool {
    let (x, y) = (point.lon_deg, point.lat_deg);
    let n = ring.len();
    let mut inside = false;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + n - 1) % n];
        let (xi, yi) = (a.lon_deg, a.lat_deg);
        let (xj, yj) = (b.lon_deg, b.lat_deg);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
    }
    inside
}

/// Inside the outer ring and outside every hole.
pub fn point_in_polygon(point: GeoPoint, rings: &[Ring]) -> bool {
    let Some((outer, holes)) = rings.split_first() else {
        return false;
    };
    point_in_ring(point, outer) && !holes.iter().any(|hole| point_in_ring(point, hole))
}

/// A multipolygon contains `point` when any single constituent does; holes
/// only apply to the polygon that owns them.
pub fn point_in_geometry(point: GeoPoint, geometry: &BoundaryGeometry) -> bool {
    match geometry {
        BoundaryGeometry::Polygon(rings) => point_in_polygon(point, rings),
        BoundaryGeometry::MultiPolygon(polys) => {
            polys.iter().any(|rings| point_in_polygon(point, rings))
        }
        BoundaryGeometry::Unsupported { .. } => false,
    }
}

pub fn point_in_feature(point: GeoPoint, feature: &BoundaryFeature) -> bool {
    point_in_geometry(point, &feature.geometry)
}
