use crate::geo::GeoPoint;

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(deg: f64) -> f64 {
    let w = deg.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if w >= 360.0 { 0.0 } else { w }
}

/// Three-axis sphere rotation in degrees.
///
/// `yaw` spins the globe about its polar axis, `pitch` tilts the pole towards or
/// away from the viewer and `roll` turns the picture about the view axis.
/// Applied in that order, the point `(-yaw, -pitch)` ends up at the view centre.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

impl Rotation {
    pub const fn new(yaw_deg: f64, pitch_deg: f64, roll_deg: f64) -> Self {
        Self {
            yaw_deg,
            pitch_deg,
            roll_deg,
        }
    }

    pub fn with_yaw(self, yaw_deg: f64) -> Self {
        Self { yaw_deg, ..self }
    }

    /// Geographic point shown at the centre of the visible hemisphere.
    pub fn view_center(&self) -> GeoPoint {
        let lon = wrap_degrees(-self.yaw_deg + 180.0) - 180.0;
        GeoPoint::new(lon, -self.pitch_deg)
    }

    pub fn rotator(&self) -> SphereRotator {
        SphereRotator::new(*self)
    }
}

/// Precomputed trigonometry for applying a [`Rotation`] to many points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SphereRotator {
    delta_lambda: f64,
    cos_delta_phi: f64,
    sin_delta_phi: f64,
    cos_delta_gamma: f64,
    sin_delta_gamma: f64,
}

impl SphereRotator {
    pub fn new(rotation: Rotation) -> Self {
        let delta_phi = rotation.pitch_deg.to_radians();
        let delta_gamma = rotation.roll_deg.to_radians();
        Self {
            delta_lambda: rotation.yaw_deg.to_radians(),
            cos_delta_phi: delta_phi.cos(),
            sin_delta_phi: delta_phi.sin(),
            cos_delta_gamma: delta_gamma.cos(),
            sin_delta_gamma: delta_gamma.sin(),
        }
    }

    /// Rotate `(lon, lat)` in radians; returns the rotated `(lambda, phi)` in radians.
    pub fn apply(&self, lon_rad: f64, lat_rad: f64) -> (f64, f64) {
        let lambda = wrap_pi(lon_rad + self.delta_lambda);

        let cos_phi = lat_rad.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = lat_rad.sin();
        let k = z * self.cos_delta_phi + x * self.sin_delta_phi;

        let out_lambda = (y * self.cos_delta_gamma - k * self.sin_delta_gamma)
            .atan2(x * self.cos_delta_phi - z * self.sin_delta_phi);
        let out_phi = (k * self.cos_delta_gamma + y * self.sin_delta_gamma)
            .clamp(-1.0, 1.0)
            .asin();
        (out_lambda, out_phi)
    }
}

fn wrap_pi(rad: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    (rad + PI).rem_euclid(TAU) - PI
}
