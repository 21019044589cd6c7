use crate::geo::GeoPoint;

/// Drawing-surface coordinate in logical pixels (y grows downwards).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        let d = self - other;
        (d.x * d.x + d.y * d.y).sqrt()
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Point on (or direction from the centre of) the unit sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit vector for a geographic position (x towards lon 0, z towards the north pole).
    pub fn from_geo(p: GeoPoint) -> Self {
        let (lon, lat) = p.to_radians();
        let cos_lat = lat.cos();
        Self::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

/// Great-circle angle between two geographic points, in degrees.
pub fn angular_distance_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    Vec3::from_geo(a)
        .dot(Vec3::from_geo(b))
        .clamp(-1.0, 1.0)
        .acos()
        .to_degrees()
}

#[cfg(test)]
mod tests {
    use super::{Vec2, Vec3, angular_distance_deg};
    use crate::geo::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn surface_distance() {
        let a = Vec2::new(1.0, 2.0);
        assert_eq!(a - Vec2::new(-0.5, 4.0), Vec2::new(1.5, -2.0));
        assert_eq!(Vec2::new(0.0, 0.0).distance(Vec2::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn dot_product() {
        assert_eq!(Vec3::new(1.0, 2.0, -1.0).dot(Vec3::new(0.5, -2.0, 3.0)), -6.5);
    }

    #[test]
    fn unit_vectors_for_cardinal_points() {
        let p = Vec3::from_geo(GeoPoint::new(90.0, 0.0));
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 1.0, 1e-12);
        let n = Vec3::from_geo(GeoPoint::new(123.0, 90.0));
        assert_close(n.z, 1.0, 1e-12);
    }

    #[test]
    fn angular_distance_along_equator() {
        assert_close(
            angular_distance_deg(GeoPoint::new(10.0, 0.0), GeoPoint::new(100.0, 0.0)),
            90.0,
            1e-9,
        );
        assert_close(
            angular_distance_deg(GeoPoint::new(0.0, 0.0), GeoPoint::new(180.0, 0.0)),
            180.0,
            1e-9,
        );
    }
}
