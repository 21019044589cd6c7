use layers::{DotPalette, Lattice};
use serde::Deserialize;
use streaming::{WorldSource, default_sources};

use crate::graticule::GraticuleStyle;
use crate::view::RotationState;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid globe config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid globe config: {0}")]
    Invalid(String),
}

/// Every tunable of the globe widget. Missing JSON fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Initial `[yaw, pitch, roll]` in degrees; pitch and roll never change.
    pub rotation: [f64; 3],
    /// Yaw added per frame while auto-rotating.
    pub rotation_speed_deg: f64,
    /// Degrees of yaw per pixel of horizontal drag.
    pub drag_sensitivity: f64,
    pub resume_delay_ms: f64,
    pub lattice: Lattice,
    /// Globe radius is the surface size divided by this.
    pub radius_divisor: f64,
    /// Projection scale relative to the radius; also scales dots and lines.
    pub zoom: f64,
    pub dot_radius: f64,
    pub graticule: GraticuleStyle,
    pub palette: DotPalette,
    /// Overrides the built-in source list when set.
    pub sources: Option<Vec<WorldSource>>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            rotation: [0.0, -15.0, 10.0],
            rotation_speed_deg: 0.08,
            drag_sensitivity: 0.5,
            resume_delay_ms: 10.0,
            lattice: Lattice::default(),
            radius_divisor: 2.8,
            zoom: 1.3,
            dot_radius: 1.2,
            graticule: GraticuleStyle::default(),
            palette: DotPalette::default(),
            sources: None,
        }
    }
}

impl GlobeConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: GlobeConfig = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("lattice.spacing", self.lattice.spacing),
            ("lattice.step_fraction", self.lattice.step_fraction),
            ("radius_divisor", self.radius_divisor),
            ("zoom", self.zoom),
            ("dot_radius", self.dot_radius),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        let finite = [
            ("rotation_speed_deg", self.rotation_speed_deg),
            ("drag_sensitivity", self.drag_sensitivity),
            ("resume_delay_ms", self.resume_delay_ms),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite")));
            }
        }
        if self.sources.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::Invalid("sources must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn initial_rotation(&self) -> RotationState {
        let [yaw, pitch, roll] = self.rotation;
        RotationState::new(yaw, pitch, roll)
    }

    pub fn world_sources(&self) -> Vec<WorldSource> {
        self.sources.clone().unwrap_or_else(default_sources)
    }
}
