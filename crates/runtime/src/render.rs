//! Frame painting against an abstract 2D surface.

use foundation::math::Vec2;
use layers::{Dot, DotPalette};

use crate::graticule::{Graticule, GraticuleStyle};
use crate::view::GlobeView;

/// The drawing operations a frame needs. Coordinates are logical pixels.
pub trait DrawSurface {
    fn clear(&mut self, width: f64, height: f64);
    fn stroke_polylines(&mut self, lines: &[Vec<Vec2>], color: [f32; 3], alpha: f32, width: f64);
    fn fill_circle(&mut self, center: Vec2, radius: f64, color: [f32; 3], alpha: f32);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameStyle {
    pub palette: DotPalette,
    /// Dot radius before the view's scale factor is applied.
    pub dot_radius: f64,
    pub graticule: GraticuleStyle,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub painted: usize,
    pub highlighted_painted: usize,
    /// Dots behind the globe or outside the surface.
    pub skipped: usize,
}

/// Clear, stroke the graticule, then paint every visible dot in order.
pub fn render_frame<S: DrawSurface + ?Sized>(
    surface: &mut S,
    view: &GlobeView,
    graticule: &Graticule,
    dots: &[Dot],
    style: &FrameStyle,
) -> FrameStats {
    let size = view.size_px();
    let scale_factor = view.scale_factor();
    let projection = view.projection();

    surface.clear(size, size);

    let lines = graticule.project(projection);
    if !lines.is_empty() {
        surface.stroke_polylines(
            &lines,
            style.graticule.color,
            style.graticule.alpha,
            style.graticule.width * scale_factor,
        );
    }

    let radius = style.dot_radius * scale_factor;
    let mut stats = FrameStats::default();
    for dot in dots {
        let Some(p) = projection.project(dot.position()) else {
            stats.skipped += 1;
            continue;
        };
        if !within_margin(p, size, radius) {
            stats.skipped += 1;
            continue;
        }
        surface.fill_circle(p, radius, style.palette.color_for(dot.highlighted), dot.opacity);
        stats.painted += 1;
        if dot.highlighted {
            stats.highlighted_painted += 1;
        }
    }
    stats
}

fn within_margin(p: Vec2, size: f64, margin: f64) -> bool {
    p.x >= -margin && p.x <= size + margin && p.y >= -margin && p.y <= size + margin
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;

    use super::{DrawSurface, FrameStyle, render_frame};
    use crate::graticule::{Graticule, GraticuleStyle};
    use crate::view::{GlobeView, RotationState};
    use foundation::math::Vec2;
    use layers::{DEFAULT_DOT_OPACITY, Dot, DotPalette};

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Op {
        Clear,
        Stroke { lines: usize, width: f64, alpha: f32 },
        Fill { center: Vec2, radius: f64, color: [f32; 3], alpha: f32 },
    }

    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub(crate) fn fills(&self) -> Vec<&Op> {
            self.ops.iter().filter(|op| matches!(op, Op::Fill { .. })).collect()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn clear(&mut self, _width: f64, _height: f64) {
            self.ops.push(Op::Clear);
        }

        fn stroke_polylines(
            &mut self,
            lines: &[Vec<Vec2>],
            _color: [f32; 3],
            alpha: f32,
            width: f64,
        ) {
            self.ops.push(Op::Stroke {
                lines: lines.len(),
                width,
                alpha,
            });
        }

        fn fill_circle(&mut self, center: Vec2, radius: f64, color: [f32; 3], alpha: f32) {
            self.ops.push(Op::Fill {
                center,
                radius,
                color,
                alpha,
            });
        }
    }

    fn dot(lon: f64, lat: f64, highlighted: bool) -> Dot {
        Dot {
            lon_deg: lon,
            lat_deg: lat,
            country: Arc::from("X"),
            highlighted,
            opacity: DEFAULT_DOT_OPACITY,
        }
    }

    fn style() -> FrameStyle {
        FrameStyle {
            palette: DotPalette::default(),
            dot_radius: 1.2,
            graticule: GraticuleStyle::default(),
        }
    }

    #[test]
    fn paints_in_layer_order_and_skips_far_side() {
        let view = GlobeView::new(280.0, 1.0, RotationState::new(0.0, 0.0, 0.0), 2.8, 1.0);
        let dots = vec![dot(0.0, 0.0, true), dot(180.0, 0.0, false), dot(30.0, 10.0, false)];
        let mut surface = RecordingSurface::default();
        let stats = render_frame(&mut surface, &view, &Graticule::standard(), &dots, &style());

        assert_eq!(stats.painted, 2);
        assert_eq!(stats.highlighted_painted, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(surface.ops[0], Op::Clear);
        assert!(matches!(
            surface.ops[1],
            Op::Stroke { alpha, width, .. } if alpha == 0.25 && width == 1.0
        ));

        let fills = surface.fills();
        assert_eq!(fills.len(), 2);
        let Op::Fill { center, radius, color, alpha } = fills[0] else {
            unreachable!()
        };
        assert!((center.x - 140.0).abs() < 1e-9 && (center.y - 140.0).abs() < 1e-9);
        assert_eq!(*radius, 1.2);
        assert_eq!(*color, DotPalette::default().highlighted);
        assert_eq!(*alpha, DEFAULT_DOT_OPACITY);
    }

    #[test]
    fn dots_outside_the_surface_margin_are_skipped() {
        // Zoomed in far enough that the visible hemisphere overflows the surface.
        let view = GlobeView::new(100.0, 1.0, RotationState::new(0.0, 0.0, 0.0), 0.5, 1.0);
        let dots = vec![dot(0.0, 0.0, false), dot(60.0, 0.0, false)];
        let mut surface = RecordingSurface::default();
        let stats = render_frame(&mut surface, &view, &Graticule::standard(), &dots, &style());
        assert_eq!(stats.painted, 1);
        assert_eq!(stats.skipped, 1);
    }
}
