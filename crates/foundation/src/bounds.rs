use crate::geo::GeoPoint;

/// Planar lon/lat bounding box (degrees).
///
/// This is a plain min/max over coordinates, not a spherical bound: a ring that
/// crosses the antimeridian yields a box spanning the whole longitude range it
/// touches.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min: GeoPoint,
    pub max: GeoPoint,
}

impl GeoBounds {
    pub fn new(min: GeoPoint, max: GeoPoint) -> Self {
        GeoBounds { min, max }
    }

    /// Bounds of a point set, skipping non-finite coordinates.
    ///
    /// Returns `None` when no finite point was seen.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a GeoPoint>) -> Option<Self> {
        let mut out: Option<Self> = None;
        for p in points {
            if !p.is_finite() {
                continue;
            }
            match out.as_mut() {
                Some(b) => b.expand(*p),
                None => out = Some(Self::new(*p, *p)),
            }
        }
        out
    }

    pub fn expand(&mut self, p: GeoPoint) {
        self.min.lon_deg = self.min.lon_deg.min(p.lon_deg);
        self.min.lat_deg = self.min.lat_deg.min(p.lat_deg);
        self.max.lon_deg = self.max.lon_deg.max(p.lon_deg);
        self.max.lat_deg = self.max.lat_deg.max(p.lat_deg);
    }

    pub fn union(mut self, other: Self) -> Self {
        self.expand(other.min);
        self.expand(other.max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBounds;
    use crate::geo::GeoPoint;

    #[test]
    fn bounds_cover_all_points() {
        let pts = [
            GeoPoint::new(-10.0, 5.0),
            GeoPoint::new(20.0, -3.0),
            GeoPoint::new(4.0, 40.0),
        ];
        let b = GeoBounds::from_points(&pts).expect("bounds");
        assert_eq!(b.min, GeoPoint::new(-10.0, -3.0));
        assert_eq!(b.max, GeoPoint::new(20.0, 40.0));
    }

    #[test]
    fn empty_or_nan_only_has_no_bounds() {
        assert!(GeoBounds::from_points(&[]).is_none());
        assert!(GeoBounds::from_points(&[GeoPoint::new(f64::NAN, 1.0)]).is_none());
    }

    #[test]
    fn union_merges_boxes() {
        let a = GeoBounds::new(GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0));
        let b = GeoBounds::new(GeoPoint::new(-2.0, 0.5), GeoPoint::new(0.5, 3.0));
        let u = a.union(b);
        assert_eq!(u.min, GeoPoint::new(-2.0, 0.0));
        assert_eq!(u.max, GeoPoint::new(1.0, 3.0));
    }
}
