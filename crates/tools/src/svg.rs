//! SVG rendition of a frame, for snapshots outside the browser.

use std::fmt::Write as _;

use foundation::math::Vec2;
use layers::rgba_css;
use runtime::DrawSurface;

/// Collects drawing calls as SVG elements. `clear` discards earlier output.
#[derive(Debug, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
    background: Option<String>,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint a solid rectangle under everything (the widget itself is transparent).
    pub fn with_background(mut self, css_color: &str) -> Self {
        self.background = Some(css_color.to_string());
        self
    }

    pub fn finish(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut s = String::new();
        let _ = writeln!(
            s,
            "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}'>"
        );
        if let Some(bg) = &self.background {
            let bg = escape_attr(bg);
            let _ = writeln!(s, "  <rect width='{w}' height='{h}' fill='{bg}'/>");
        }
        s.push_str(&self.body);
        s.push_str("</svg>\n");
        s
    }
}

/// Escape text for a single-quoted XML attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

impl DrawSurface for SvgSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.body.clear();
    }

    fn stroke_polylines(&mut self, lines: &[Vec<Vec2>], color: [f32; 3], alpha: f32, width: f64) {
        let mut d = String::new();
        for line in lines {
            for (i, p) in line.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{:.2},{:.2}", p.x, p.y);
            }
        }
        if d.is_empty() {
            return;
        }
        let _ = writeln!(
            self.body,
            "  <path d='{d}' fill='none' stroke='{}' stroke-width='{width:.2}'/>",
            rgba_css(color, alpha)
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f64, color: [f32; 3], alpha: f32) {
        let _ = writeln!(
            self.body,
            "  <circle cx='{:.2}' cy='{:.2}' r='{radius:.2}' fill='{}'/>",
            center.x,
            center.y,
            rgba_css(color, alpha)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::SvgSurface;
    use foundation::math::Vec2;
    use runtime::DrawSurface;

    #[test]
    fn writes_paths_and_circles() {
        let mut svg = SvgSurface::new().with_background("#000");
        svg.clear(100.0, 100.0);
        svg.stroke_polylines(
            &[vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)]],
            [1.0, 1.0, 1.0],
            0.25,
            1.3,
        );
        let red = [233.0 / 255.0, 21.0 / 255.0, 45.0 / 255.0];
        svg.fill_circle(Vec2::new(50.0, 50.0), 1.56, red, 0.8);
        let out = svg.finish();
        assert!(out.starts_with("<svg"));
        assert!(out.contains("<rect width='100' height='100' fill='#000'/>"));
        assert!(out.contains("d='M0.00,0.00L10.00,5.00'"));
        assert!(out.contains("stroke='rgba(255,255,255,0.25)'"));
        assert!(
            out.contains("<circle cx='50.00' cy='50.00' r='1.56' fill='rgba(233,21,45,0.8)'/>")
        );
        assert!(out.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn clear_discards_previous_frame() {
        let mut svg = SvgSurface::new();
        svg.clear(10.0, 10.0);
        svg.fill_circle(Vec2::new(1.0, 1.0), 1.0, [1.0, 1.0, 1.0], 1.0);
        svg.clear(20.0, 20.0);
        let out = svg.finish();
        assert!(!out.contains("<circle"));
        assert!(out.contains("width='20'"));
    }

    #[test]
    fn background_is_escaped_inside_the_attribute() {
        let mut svg = SvgSurface::new().with_background("red' onload='x()<");
        svg.clear(10.0, 10.0);
        let out = svg.finish();
        assert!(out.contains("fill='red&apos; onload=&apos;x()&lt;'"));
        assert!(!out.contains("onload='"));
    }
}
