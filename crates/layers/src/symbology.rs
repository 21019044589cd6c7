use serde::Deserialize;

/// Country names (lower case) whose dots are drawn in the highlight colour.
pub const HIGHLIGHTED_COUNTRIES: [&str; 6] = [
    "brazil",
    "brasil",
    "united states",
    "united states of america",
    "usa",
    "us",
];

/// Exact match against [`HIGHLIGHTED_COUNTRIES`] after trimming and lower-casing.
pub fn is_highlighted_country(name: &str) -> bool {
    let normalized = name.trim().to_lowercase();
    HIGHLIGHTED_COUNTRIES.contains(&normalized.as_str())
}

/// Dot colours as linear `[r, g, b]` in `0..=1`.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DotPalette {
    pub highlighted: [f32; 3],
    pub regular: [f32; 3],
}

impl DotPalette {
    pub const fn new(highlighted: [f32; 3], regular: [f32; 3]) -> Self {
        Self {
            highlighted,
            regular,
        }
    }

    pub fn color_for(&self, highlighted: bool) -> [f32; 3] {
        if highlighted {
            self.highlighted
        } else {
            self.regular
        }
    }
}

impl Default for DotPalette {
    fn default() -> Self {
        Self {
            highlighted: [233.0 / 255.0, 21.0 / 255.0, 45.0 / 255.0],
            regular: [1.0, 1.0, 1.0],
        }
    }
}

/// CSS `rgba(...)` string for a colour and alpha.
pub fn rgba_css(rgb: [f32; 3], alpha: f32) -> String {
    let r = (rgb[0].clamp(0.0, 1.0) * 255.0).round() as u32;
    let g = (rgb[1].clamp(0.0, 1.0) * 255.0).round() as u32;
    let b = (rgb[2].clamp(0.0, 1.0) * 255.0).round() as u32;
    let a = alpha.clamp(0.0, 1.0);
    format!("rgba({r},{g},{b},{a})")
}
