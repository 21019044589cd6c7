//! Widget lifecycle: loading, then auto rotation interleaved with drags.

use formats::FeatureCollection;
use foundation::Millis;
use layers::DotField;
use streaming::LoadError;
use tracing::{info, trace, warn};

use crate::config::GlobeConfig;
use crate::frame::Frame;
use crate::graticule::Graticule;
use crate::interaction::{InteractionController, PointerKind};
use crate::render::{DrawSurface, FrameStats, FrameStyle, render_frame};
use crate::view::GlobeView;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Loading,
    Animating,
    Dragging,
}

/// Owns everything a frame needs; the host only feeds it events and timestamps.
#[derive(Debug)]
pub struct RenderLoop {
    phase: LoopPhase,
    view: GlobeView,
    interaction: InteractionController,
    graticule: Graticule,
    style: FrameStyle,
    config: GlobeConfig,
    dots: DotField,
    error: Option<LoadError>,
    last_frame: Option<Frame>,
}

impl RenderLoop {
    pub fn new(config: GlobeConfig, size_px: f64, device_pixel_ratio: f64) -> Self {
        let view = GlobeView::new(
            size_px,
            device_pixel_ratio,
            config.initial_rotation(),
            config.radius_divisor,
            config.zoom,
        );
        Self {
            phase: LoopPhase::Idle,
            view,
            interaction: InteractionController::new(
                config.drag_sensitivity,
                config.resume_delay_ms,
            ),
            graticule: Graticule::standard(),
            style: FrameStyle {
                palette: config.palette,
                dot_radius: config.dot_radius,
                graticule: config.graticule,
            },
            config,
            dots: DotField::default(),
            error: None,
            last_frame: None,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn view(&self) -> &GlobeView {
        &self.view
    }

    pub fn dots(&self) -> &DotField {
        &self.dots
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    /// Terminal load failure, if any. Once set the globe never animates.
    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, LoopPhase::Animating | LoopPhase::Dragging)
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.last_frame
    }

    pub fn begin_loading(&mut self) {
        if self.phase == LoopPhase::Idle {
            self.phase = LoopPhase::Loading;
        }
    }

    /// Build the dot field from loaded features, or record the failure.
    pub fn on_load_result(&mut self, result: Result<FeatureCollection, LoadError>) {
        if self.phase != LoopPhase::Loading {
            warn!(phase = ?self.phase, "load result ignored outside the loading phase");
            return;
        }
        match result {
            Ok(features) => {
                self.dots = DotField::with_lattice(&features.features, self.config.lattice);
                info!(
                    dots = self.dots.len(),
                    highlighted = self.dots.highlighted_count(),
                    "globe ready"
                );
                self.phase = LoopPhase::Animating;
            }
            Err(err) => {
                warn!(error = %err, "failed to load geographic data");
                self.error = Some(err);
            }
        }
    }

    pub fn resize(&mut self, size_px: f64, device_pixel_ratio: f64) {
        self.view.resize(size_px, device_pixel_ratio);
    }

    pub fn pointer_down(&mut self, kind: PointerKind, x: f64) -> bool {
        if !self.is_ready() {
            return false;
        }
        let started = self
            .interaction
            .start(kind, x, self.view.rotation().yaw_deg());
        if started {
            self.phase = LoopPhase::Dragging;
        }
        started
    }

    pub fn pointer_move(&mut self, x: f64) {
        if let Some(yaw) = self.interaction.move_to(x) {
            self.view.set_yaw(yaw);
        }
    }

    pub fn pointer_up(&mut self, now: Millis) {
        self.interaction.end(now);
    }

    /// Drop any drag and pending resume, e.g. when the host tears down.
    pub fn cancel_interaction(&mut self) {
        self.interaction.cancel();
    }

    /// Advance one tick and paint. Returns `None` until the dots are ready.
    pub fn frame<S: DrawSurface + ?Sized>(
        &mut self,
        now: Millis,
        surface: &mut S,
    ) -> Option<FrameStats> {
        if !self.is_ready() {
            return None;
        }
        let frame = match self.last_frame {
            Some(prev) => prev.next(now),
            None => Frame::first(now),
        };
        self.last_frame = Some(frame);

        if self.interaction.poll(now) {
            self.phase = LoopPhase::Animating;
            self.view.advance(self.config.rotation_speed_deg);
        } else {
            self.phase = LoopPhase::Dragging;
        }

        let stats = render_frame(
            surface,
            &self.view,
            &self.graticule,
            self.dots.dots(),
            &self.style,
        );
        trace!(
            frame = frame.index,
            dt_ms = frame.dt_ms,
            yaw = self.view.rotation().yaw_deg(),
            painted = stats.painted,
            highlighted = stats.highlighted_painted,
            skipped = stats.skipped,
            "frame"
        );
        Some(stats)
    }
}
