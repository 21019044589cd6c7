//! Latitude/longitude grid drawn behind the dots.

use foundation::GeoPoint;
use foundation::math::{OrthographicProjection, Vec2};
use serde::Deserialize;

const MINOR_STEP_DEG: f64 = 10.0;
const MAJOR_STEP_DEG: f64 = 90.0;
const MINOR_LAT_EXTENT_DEG: f64 = 80.0;
const SAMPLE_STEP_DEG: f64 = 2.5;

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraticuleStyle {
    pub color: [f32; 3],
    pub alpha: f32,
    /// Line width before the view's scale factor is applied.
    pub width: f64,
}

impl Default for GraticuleStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            alpha: 0.25,
            width: 1.0,
        }
    }
}

/// Graticule lines as geographic polylines, built once.
#[derive(Debug, Clone, PartialEq)]
pub struct Graticule {
    lines: Vec<Vec<GeoPoint>>,
}

impl Default for Graticule {
    fn default() -> Self {
        Self::standard()
    }
}

impl Graticule {
    /// 10° minor grid within ±80° latitude, meridians every 90° running pole to
    /// pole, and the equator.
    pub fn standard() -> Self {
        let mut lines = Vec::new();

        for lon in stepped(-180.0, 180.0, MINOR_STEP_DEG) {
            if !is_multiple(lon, MAJOR_STEP_DEG) {
                lines.push(meridian(lon, MINOR_LAT_EXTENT_DEG));
            }
        }
        let lat_end = MINOR_LAT_EXTENT_DEG + MINOR_STEP_DEG;
        for lat in stepped(-MINOR_LAT_EXTENT_DEG, lat_end, MINOR_STEP_DEG) {
            if !is_multiple(lat, MAJOR_STEP_DEG) {
                lines.push(parallel(lat));
            }
        }
        for lon in stepped(-180.0, 180.0, MAJOR_STEP_DEG) {
            lines.push(meridian(lon, 90.0));
        }
        lines.push(parallel(0.0));

        Self { lines }
    }

    pub fn lines(&self) -> &[Vec<GeoPoint>] {
        &self.lines
    }

    /// Project every line, splitting it wherever samples fall outside the clip.
    pub fn project(&self, projection: &OrthographicProjection) -> Vec<Vec<Vec2>> {
        let mut out = Vec::new();
        for line in &self.lines {
            let mut run: Vec<Vec2> = Vec::new();
            for &p in line {
                match projection.project(p) {
                    Some(xy) => run.push(xy),
                    None => flush(&mut run, &mut out),
                }
            }
            flush(&mut run, &mut out);
        }
        out
    }
}

fn flush(run: &mut Vec<Vec2>, out: &mut Vec<Vec<Vec2>>) {
    if run.len() >= 2 {
        out.push(std::mem::take(run));
    } else {
        run.clear();
    }
}

/// `start, start + step, ...` strictly below `end`, index based.
fn stepped(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(move |i| start + f64::from(i) * step)
        .take_while(move |v| *v < end)
}

fn is_multiple(value: f64, of: f64) -> bool {
    (value % of).abs() < 1e-6
}

fn meridian(lon: f64, extent: f64) -> Vec<GeoPoint> {
    stepped(-extent, extent + SAMPLE_STEP_DEG / 2.0, SAMPLE_STEP_DEG)
        .map(|lat| GeoPoint::new(lon, lat.min(extent)))
        .collect()
}

fn parallel(lat: f64) -> Vec<GeoPoint> {
    stepped(-180.0, 180.0 + SAMPLE_STEP_DEG / 2.0, SAMPLE_STEP_DEG)
        .map(|lon| GeoPoint::new(lon.min(180.0), lat))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Graticule;
    use foundation::GeoPoint;
    use foundation::math::{OrthographicProjection, ProjectionParams, Rotation, Vec2};

    #[test]
    fn standard_grid_line_counts() {
        let g = Graticule::standard();
        // 32 minor meridians, 16 minor parallels, 4 major meridians, equator.
        assert_eq!(g.lines().len(), 32 + 16 + 4 + 1);
        let minor_meridian = &g.lines()[0];
        assert_eq!(minor_meridian.first(), Some(&GeoPoint::new(-170.0, -80.0)));
        assert_eq!(minor_meridian.last(), Some(&GeoPoint::new(-170.0, 80.0)));
        assert_eq!(minor_meridian.len(), 65);
        let equator = g.lines().last().expect("equator");
        assert_eq!(equator.len(), 145);
        assert!(equator.iter().all(|p| p.lat_deg == 0.0));
    }

    #[test]
    fn projected_lines_stay_on_the_disk() {
        let projection = OrthographicProjection::new(ProjectionParams::new(
            100.0,
            Vec2::new(150.0, 150.0),
            Rotation::new(20.0, -15.0, 10.0),
        ));
        let lines = Graticule::standard().project(&projection);
        assert!(!lines.is_empty());
        for line in &lines {
            assert!(line.len() >= 2);
            for p in line {
                assert!(p.distance(Vec2::new(150.0, 150.0)) <= 100.0 + 1e-9);
            }
        }
    }
}
