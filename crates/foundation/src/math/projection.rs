//! Orthographic (globe) projection with a circular clip.
//!
//! Geographic points are rotated by the current [`Rotation`], then projected as
//! `x = cos(phi) * sin(lambda)`, `y = sin(phi)` and mapped onto the drawing
//! surface with `scale` and `translate` (screen y grows downwards). Points on
//! the far side of the clip circle project to `None`.

use super::rotation::{Rotation, SphereRotator};
use super::vec::Vec2;
use crate::geo::GeoPoint;

/// Default clip angle: exactly one hemisphere is visible.
pub const DEFAULT_CLIP_ANGLE_DEG: f64 = 90.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectionParams {
    /// Sphere radius in logical pixels.
    pub scale: f64,
    /// Surface position of the view centre.
    pub translate: Vec2,
    pub clip_angle_deg: f64,
    pub rotation: Rotation,
}

impl ProjectionParams {
    pub fn new(scale: f64, translate: Vec2, rotation: Rotation) -> Self {
        Self {
            scale,
            translate,
            clip_angle_deg: DEFAULT_CLIP_ANGLE_DEG,
            rotation,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrthographicProjection {
    params: ProjectionParams,
    rotator: SphereRotator,
    cos_clip: f64,
}

impl OrthographicProjection {
    pub fn new(params: ProjectionParams) -> Self {
        Self {
            rotator: params.rotation.rotator(),
            cos_clip: params.clip_angle_deg.to_radians().cos(),
            params,
        }
    }

    pub fn params(&self) -> &ProjectionParams {
        &self.params
    }

    pub fn scale(&self) -> f64 {
        self.params.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.params.translate
    }

    pub fn rotation(&self) -> Rotation {
        self.params.rotation
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.params.scale = scale;
    }

    pub fn set_translate(&mut self, translate: Vec2) {
        self.params.translate = translate;
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        if rotation != self.params.rotation {
            self.params.rotation = rotation;
            self.rotator = rotation.rotator();
        }
    }

    /// Rotated `(lambda, phi)` in radians plus the clip verdict.
    fn rotate(&self, p: GeoPoint) -> (f64, f64, bool) {
        let (lon, lat) = p.to_radians();
        let (lambda, phi) = self.rotator.apply(lon, lat);
        // cos of the angular distance from the view centre.
        let visible = lambda.cos() * phi.cos() > self.cos_clip;
        (lambda, phi, visible)
    }

    pub fn is_visible(&self, p: GeoPoint) -> bool {
        self.rotate(p).2
    }

    /// Surface coordinate of `p`, or `None` when it falls outside the clip angle.
    pub fn project(&self, p: GeoPoint) -> Option<Vec2> {
        if !p.is_finite() {
            return None;
        }
        let (lambda, phi, visible) = self.rotate(p);
        if !visible {
            return None;
        }
        let x = phi.cos() * lambda.sin();
        let y = phi.sin();
        Some(Vec2::new(
            self.params.translate.x + self.params.scale * x,
            self.params.translate.y - self.params.scale * y,
        ))
    }
}
