//! Surface-sized globe view: rotation state plus the projection derived from it.

use foundation::math::{OrthographicProjection, ProjectionParams, Rotation, Vec2, wrap_degrees};

/// Globe orientation in degrees. Only yaw changes after construction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationState {
    yaw_deg: f64,
    pitch_deg: f64,
    roll_deg: f64,
}

impl RotationState {
    pub fn new(yaw_deg: f64, pitch_deg: f64, roll_deg: f64) -> Self {
        Self {
            yaw_deg: wrap_degrees(yaw_deg),
            pitch_deg,
            roll_deg,
        }
    }

    pub fn yaw_deg(&self) -> f64 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }

    pub fn roll_deg(&self) -> f64 {
        self.roll_deg
    }

    /// Yaw is kept in `[0, 360)`.
    pub fn set_yaw(&mut self, yaw_deg: f64) {
        self.yaw_deg = wrap_degrees(yaw_deg);
    }

    pub fn advance(&mut self, delta_deg: f64) {
        self.set_yaw(self.yaw_deg + delta_deg);
    }

    pub fn as_rotation(&self) -> Rotation {
        Rotation::new(self.yaw_deg, self.pitch_deg, self.roll_deg)
    }
}

/// Square drawing-surface size in CSS pixels.
///
/// Each container dimension falls back to the requested one when it is zero
/// or unusable; the smaller of the two wins.
pub fn fit_surface(container: (f64, f64), requested: (f64, f64)) -> f64 {
    let pick = |measured: f64, fallback: f64| {
        if measured.is_finite() && measured > 0.0 {
            measured
        } else {
            fallback
        }
    };
    pick(container.0, requested.0).min(pick(container.1, requested.1)).max(0.0)
}

#[derive(Debug, Clone)]
pub struct GlobeView {
    rotation: RotationState,
    size_px: f64,
    device_pixel_ratio: f64,
    radius_divisor: f64,
    zoom: f64,
    projection: OrthographicProjection,
}

impl GlobeView {
    pub fn new(
        size_px: f64,
        device_pixel_ratio: f64,
        rotation: RotationState,
        radius_divisor: f64,
        zoom: f64,
    ) -> Self {
        let params = projection_params(size_px, rotation, radius_divisor, zoom);
        Self {
            rotation,
            size_px,
            device_pixel_ratio: sanitize_dpr(device_pixel_ratio),
            radius_divisor,
            zoom,
            projection: OrthographicProjection::new(params),
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn projection(&self) -> &OrthographicProjection {
        &self.projection
    }

    pub fn size_px(&self) -> f64 {
        self.size_px
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Backing-store edge length in device pixels.
    pub fn backing_px(&self) -> u32 {
        (self.size_px * self.device_pixel_ratio).round().max(0.0) as u32
    }

    pub fn radius(&self) -> f64 {
        self.size_px / self.radius_divisor
    }

    /// Projection scale over radius; dot radius and line width are multiplied by it.
    pub fn scale_factor(&self) -> f64 {
        self.zoom
    }

    pub fn set_yaw(&mut self, yaw_deg: f64) {
        self.rotation.set_yaw(yaw_deg);
        self.projection.set_rotation(self.rotation.as_rotation());
    }

    pub fn advance(&mut self, delta_deg: f64) {
        self.rotation.advance(delta_deg);
        self.projection.set_rotation(self.rotation.as_rotation());
    }

    /// Re-derive scale and translation for a new surface; rotation is untouched.
    pub fn resize(&mut self, size_px: f64, device_pixel_ratio: f64) {
        self.size_px = size_px;
        self.device_pixel_ratio = sanitize_dpr(device_pixel_ratio);
        let params = projection_params(size_px, self.rotation, self.radius_divisor, self.zoom);
        self.projection.set_scale(params.scale);
        self.projection.set_translate(params.translate);
    }
}

pub fn projection_params(
    size_px: f64,
    rotation: RotationState,
    radius_divisor: f64,
    zoom: f64,
) -> ProjectionParams {
    let radius = size_px / radius_divisor;
    ProjectionParams::new(
        radius * zoom,
        Vec2::new(size_px / 2.0, size_px / 2.0),
        rotation.as_rotation(),
    )
}

fn sanitize_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 }
}
