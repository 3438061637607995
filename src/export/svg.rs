use crate::foundation::core::{BezPath, PathEl, Point, Rgba8};
use std::fmt::Write as _;

/// MIME type of exported documents.
pub const SVG_MIME_TYPE: &str = "image/svg+xml";
/// File name offered for exported documents.
pub const EXPORT_FILE_NAME: &str = "electric_field.svg";

/// Traced paths plus the canvas they were traced from.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorDocument {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Closed contours; holes are separate contours filled even-odd with their outer boundary.
    pub paths: Vec<BezPath>,
    /// Fill color.
    pub fill: Rgba8,
}

impl VectorDocument {
    /// Number of closed contours.
    pub fn contour_count(&self) -> usize {
        self.paths.len()
    }

    /// SVG path data for all contours.
    pub fn path_data(&self) -> String {
        let mut out = String::new();
        for path in &self.paths {
            write_path_data(&mut out, path);
        }
        out
    }

    /// Serialize as a standalone SVG document.
    pub fn to_svg_string(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        if !self.paths.is_empty() {
            let _ = writeln!(
                out,
                r#"<path d="{}" fill="{}" fill-rule="evenodd"/>"#,
                self.path_data(),
                self.fill.to_hex()
            );
        }
        out.push_str("</svg>\n");
        out
    }
}

/// Control points closer than this to the chord count as lying on it.
const STRAIGHT_EPS: f64 = 1e-3;

/// Writes absolute commands; curve segments whose control points sit on their chord come out as `L`.
fn write_path_data(out: &mut String, path: &BezPath) {
    fn pt(out: &mut String, p: Point) {
        let _ = write!(out, "{} {}", num(p.x), num(p.y));
    }
    let mut start = Point::ZERO;
    let mut cur = Point::ZERO;
    for el in path.elements() {
        if !out.is_empty() {
            out.push(' ');
        }
        match *el {
            PathEl::MoveTo(p) => {
                out.push_str("M ");
                pt(out, p);
                start = p;
                cur = p;
            }
            PathEl::LineTo(p) => {
                out.push_str("L ");
                pt(out, p);
                cur = p;
            }
            PathEl::QuadTo(c, p) if is_straight(cur, &[c], p) => {
                out.push_str("L ");
                pt(out, p);
                cur = p;
            }
            PathEl::QuadTo(c, p) => {
                out.push_str("Q ");
                pt(out, c);
                out.push(' ');
                pt(out, p);
                cur = p;
            }
            PathEl::CurveTo(c0, c1, p) if is_straight(cur, &[c0, c1], p) => {
                out.push_str("L ");
                pt(out, p);
                cur = p;
            }
            PathEl::CurveTo(c0, c1, p) => {
                out.push_str("C ");
                pt(out, c0);
                out.push(' ');
                pt(out, c1);
                out.push(' ');
                pt(out, p);
                cur = p;
            }
            PathEl::ClosePath => {
                out.push('Z');
                cur = start;
            }
        }
    }
}

/// Whether every control point lies on the segment `from..to`, so the curve traces that segment.
fn is_straight(from: Point, ctrls: &[Point], to: Point) -> bool {
    let chord = to - from;
    let len2 = chord.hypot2();
    if len2 <= STRAIGHT_EPS * STRAIGHT_EPS {
        return ctrls.iter().all(|c| (*c - from).hypot() <= STRAIGHT_EPS);
    }
    let len = len2.sqrt();
    ctrls.iter().all(|c| {
        let v = *c - from;
        let along = chord.dot(v) / len;
        chord.cross(v).abs() / len <= STRAIGHT_EPS
            && along >= -STRAIGHT_EPS
            && along <= len + STRAIGHT_EPS
    })
}

/// Format with at most three decimals and no trailing zeros.
fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_owned();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/export/svg.rs"]
mod tests;
