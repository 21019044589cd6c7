use std::f64::consts::TAU;

use foundation::math::Vec2;
use layers::rgba_css;
use runtime::DrawSurface;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

/// Canvas 2D context in logical pixels; the device-pixel transform is set on resize.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// Reset the transform to `dpr` so drawing stays in CSS pixels.
    pub fn set_device_pixel_ratio(&self, dpr: f64) -> Result<(), JsValue> {
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn stroke_polylines(&mut self, lines: &[Vec<Vec2>], color: [f32; 3], alpha: f32, width: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        for line in lines {
            let Some((first, rest)) = line.split_first() else {
                continue;
            };
            ctx.move_to(first.x, first.y);
            for p in rest {
                ctx.line_to(p.x, p.y);
            }
        }
        ctx_set_stroke_style(ctx, &rgba_css(color, alpha));
        ctx.set_line_width(width);
        ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: [f32; 3], alpha: f32) {
        let ctx = &self.ctx;
        ctx_set_fill_style(ctx, &rgba_css(color, alpha));
        ctx.begin_path();
        if ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
            ctx.fill();
        }
    }
}

fn ctx_set_fill_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("fillStyle"),
        &JsValue::from_str(value),
    );
}

fn ctx_set_stroke_style(ctx: &CanvasRenderingContext2d, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str("strokeStyle"),
        &JsValue::from_str(value),
    );
}
