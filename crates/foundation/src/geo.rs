/// A geographic position in degrees.
///
/// Longitude first, matching the `[lon, lat]` ordering of GeoJSON coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl GeoPoint {
    pub const fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// `(lon, lat)` in radians.
    pub fn to_radians(self) -> (f64, f64) {
        (self.lon_deg.to_radians(), self.lat_deg.to_radians())
    }

    pub fn is_finite(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from(v: (f64, f64)) -> Self {
        Self::new(v.0, v.1)
    }
}
