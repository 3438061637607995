//! Bitmap to vector tracing.
//!
//! The tracer thresholds a grayscale image into a binary bitmap, removes speckles, follows the
//! pixel-edge boundaries of every foreground region into closed polygons, straightens them, and
//! finally rounds shallow corners into curves.

use crate::foundation::core::{BezPath, PathEl, Point};
use crate::foundation::error::{FieldError, FieldResult};
use kurbo::simplify::{SimplifyOptions, simplify_bezpath};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Tracing policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceOpts {
    /// 8-bit luma threshold separating foreground from background.
    pub threshold: u8,
    /// Regions (and holes) of at most this many pixels are dropped as speckle.
    pub turd_size: u32,
    /// Maximum distance in pixels a straightened polygon may deviate from the pixel boundary.
    pub corner_tolerance: f64,
    /// Vertices turning by less than this angle (radians) are rounded into curves.
    pub alpha_max: f64,
    /// Merge consecutive curve segments where the result stays within `opt_tolerance`.
    pub opt_curve: bool,
    /// Curve merge tolerance in pixels.
    pub opt_tolerance: f64,
}

impl Default for TraceOpts {
    fn default() -> Self {
        Self {
            threshold: 128,
            turd_size: 2,
            corner_tolerance: 0.5,
            alpha_max: 1.2,
            opt_curve: true,
            opt_tolerance: 0.2,
        }
    }
}

/// Which side of the threshold counts as foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Pixels darker than the threshold are traced.
    Dark,
    /// Pixels at or above the threshold are traced.
    Light,
}

/// Binary image, row-major, `true` = foreground.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Bitmap {
    /// Threshold a grayscale image.
    pub fn from_luma(img: &image::GrayImage, threshold: u8, polarity: Polarity) -> Self {
        let bits = img
            .pixels()
            .map(|p| match polarity {
                Polarity::Dark => p.0[0] < threshold,
                Polarity::Light => p.0[0] >= threshold,
            })
            .collect();
        Self {
            width: img.width(),
            height: img.height(),
            bits,
        }
    }

    /// Build from raw bits. Fails when `bits.len() != width * height`.
    pub fn from_bits(width: u32, height: u32, bits: Vec<bool>) -> FieldResult<Self> {
        if bits.len() != (width as usize) * (height as usize) {
            return Err(FieldError::trace(format!(
                "bitmap has {} bits, expected {width}x{height}",
                bits.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Foreground test; out-of-bounds pixels are background.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        self.bits[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Drop foreground regions of at most `max_area` pixels and fill enclosed holes of the same
    /// size. Connectivity is 4-neighbour for both.
    pub fn despeckle(&mut self, max_area: u32) {
        if max_area == 0 {
            return;
        }
        self.flip_small_components(true, max_area as usize);
        self.flip_small_components(false, max_area as usize);
    }

    fn flip_small_components(&mut self, value: bool, max_area: usize) {
        let w = self.width as usize;
        let h = self.height as usize;
        let mut seen = vec![false; self.bits.len()];
        let mut stack = Vec::new();
        let mut component = Vec::new();

        for start in 0..self.bits.len() {
            if seen[start] || self.bits[start] != value {
                continue;
            }
            seen[start] = true;
            stack.push(start);
            component.clear();
            let mut touches_border = false;

            while let Some(i) = stack.pop() {
                component.push(i);
                let (x, y) = (i % w, i / w);
                touches_border |= x == 0 || y == 0 || x + 1 == w || y + 1 == h;

                let mut visit = |j: usize| {
                    if !seen[j] && self.bits[j] == value {
                        seen[j] = true;
                        stack.push(j);
                    }
                };
                if x > 0 {
                    visit(i - 1);
                }
                if x + 1 < w {
                    visit(i + 1);
                }
                if y > 0 {
                    visit(i - w);
                }
                if y + 1 < h {
                    visit(i + w);
                }
            }

            // Background touching the border is the outside, not a hole.
            let is_hole_candidate = value || !touches_border;
            if is_hole_candidate && component.len() <= max_area {
                for &i in &component {
                    self.bits[i] = !value;
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Edge {
    from: (u32, u32),
    to: (u32, u32),
}

impl Edge {
    fn dir(self) -> (i64, i64) {
        (
            i64::from(self.to.0) - i64::from(self.from.0),
            i64::from(self.to.1) - i64::from(self.from.1),
        )
    }
}

/// Follow region boundaries into closed polygons on the pixel-corner grid.
///
/// Boundaries run clockwise around foreground (y down) and counter-clockwise around holes. Where two
/// regions touch diagonally the walk turns right, keeping them separate.
pub fn boundary_polygons(bitmap: &Bitmap) -> FieldResult<Vec<Vec<Point>>> {
    let w = bitmap.width;
    let h = bitmap.height;
    let vid = |(x, y): (u32, u32)| (y as usize) * (w as usize + 1) + (x as usize);

    let mut edges: Vec<Edge> = Vec::new();
    for y in 0..h {
        for x in 0..w {
            let (xi, yi) = (i64::from(x), i64::from(y));
            if !bitmap.get(xi, yi) {
                continue;
            }
            if !bitmap.get(xi, yi - 1) {
                edges.push(Edge { from: (x, y), to: (x + 1, y) });
            }
            if !bitmap.get(xi + 1, yi) {
                edges.push(Edge { from: (x + 1, y), to: (x + 1, y + 1) });
            }
            if !bitmap.get(xi, yi + 1) {
                edges.push(Edge { from: (x + 1, y + 1), to: (x, y + 1) });
            }
            if !bitmap.get(xi - 1, yi) {
                edges.push(Edge { from: (x, y + 1), to: (x, y) });
            }
        }
    }

    let mut outgoing: Vec<SmallVec<[u32; 2]>> =
        vec![SmallVec::new(); (w as usize + 1) * (h as usize + 1)];
    for (i, e) in edges.iter().enumerate() {
        outgoing[vid(e.from)].push(i as u32);
    }

    let mut used = vec![false; edges.len()];
    let mut polygons = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }

        let mut corners = Vec::new();
        let mut cur = start;
        loop {
            used[cur] = true;
            let e = edges[cur];
            corners.push(e.from);

            let (ix, iy) = e.dir();
            let next = outgoing[vid(e.to)]
                .iter()
                .map(|&c| c as usize)
                .filter(|&c| !used[c] || c == start)
                .max_by_key(|&c| {
                    let (ox, oy) = edges[c].dir();
                    ix * oy - iy * ox
                });
            match next {
                Some(n) if n == start => break,
                Some(n) => cur = n,
                None => {
                    return Err(FieldError::trace(format!(
                        "open boundary at ({}, {})",
                        e.to.0, e.to.1
                    )));
                }
            }
        }

        let poly = drop_collinear(&corners);
        if poly.len() >= 3 {
            polygons.push(poly);
        }
    }
    Ok(polygons)
}

fn drop_collinear(corners: &[(u32, u32)]) -> Vec<Point> {
    let n = corners.len();
    let p = |i: usize| {
        let (x, y) = corners[i % n];
        (i64::from(x), i64::from(y))
    };
    (0..n)
        .filter(|&i| {
            let (ax, ay) = p(i + n - 1);
            let (bx, by) = p(i);
            let (cx, cy) = p(i + 1);
            (bx - ax) * (cy - by) - (by - ay) * (cx - bx) != 0
        })
        .map(|i| {
            let (x, y) = corners[i];
            Point::new(f64::from(x), f64::from(y))
        })
        .collect()
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return (p - a).hypot();
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).hypot()
}

fn douglas_peucker(pts: &[Point], tol: f64, keep: &mut [bool]) {
    if pts.len() < 3 {
        return;
    }
    let (a, b) = (pts[0], pts[pts.len() - 1]);
    let (idx, dist) = pts[1..pts.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, &p)| (i + 1, segment_distance(p, a, b)))
        .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if dist > tol {
        keep[idx] = true;
        douglas_peucker(&pts[..=idx], tol, &mut keep[..=idx]);
        douglas_peucker(&pts[idx..], tol, &mut keep[idx..]);
    }
}

/// Straighten a closed polygon, keeping it within `tol` of the input.
///
/// Polygons that would collapse below three vertices are returned unchanged.
pub fn simplify_polygon(poly: &[Point], tol: f64) -> Vec<Point> {
    if poly.len() <= 3 || tol <= 0.0 {
        return poly.to_vec();
    }

    // Split the ring at vertex 0 and the vertex farthest from it.
    let far = (1..poly.len())
        .max_by(|&i, &j| {
            let di = (poly[i] - poly[0]).hypot2();
            let dj = (poly[j] - poly[0]).hypot2();
            di.total_cmp(&dj)
        })
        .unwrap_or(1);

    let mut ring: Vec<Point> = poly.to_vec();
    ring.push(poly[0]);
    let mut keep = vec![false; ring.len()];
    keep[0] = true;
    keep[far] = true;
    douglas_peucker(&ring[..=far], tol, &mut keep[..=far]);
    douglas_peucker(&ring[far..], tol, &mut keep[far..]);

    let out: Vec<Point> = ring[..poly.len()]
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &k)| k.then_some(p))
        .collect();
    if out.len() < 3 { poly.to_vec() } else { out }
}

/// Closed path through the polygon's edge midpoints. Vertices turning by less than `alpha_max`
/// become quadratic control points; sharper vertices stay corners.
pub fn smooth_polygon(poly: &[Point], alpha_max: f64) -> BezPath {
    let n = poly.len();
    let mut path = BezPath::new();
    if n < 3 {
        return path;
    }
    let mid = |i: usize| poly[i % n].midpoint(poly[(i + 1) % n]);

    path.move_to(mid(0));
    for k in 1..=n {
        let v = poly[k % n];
        let a = v - poly[(k + n - 1) % n];
        let b = poly[(k + 1) % n] - v;
        let turn = a.cross(b).atan2(a.dot(b)).abs();
        if turn < alpha_max {
            path.quad_to(v, mid(k));
        } else {
            path.line_to(v);
            path.line_to(mid(k));
        }
    }
    path.close_path();
    path
}

/// Trace a binary bitmap into closed paths, one per boundary (outer or hole).
#[tracing::instrument(level = "debug", skip_all, fields(w = bitmap.width, h = bitmap.height))]
pub fn trace_bitmap(bitmap: &Bitmap, opts: &TraceOpts) -> FieldResult<Vec<BezPath>> {
    let mut bitmap = bitmap.clone();
    bitmap.despeckle(opts.turd_size);

    let polygons = boundary_polygons(&bitmap)?;
    let paths: Vec<BezPath> = polygons
        .iter()
        .map(|poly| {
            let straight = simplify_polygon(poly, opts.corner_tolerance);
            let smooth = smooth_polygon(&straight, opts.alpha_max);
            if !opts.opt_curve {
                return smooth;
            }
            let mut merged = simplify_bezpath(
                smooth.elements().iter().copied(),
                opts.opt_tolerance,
                &SimplifyOptions::default(),
            );
            if !matches!(merged.elements().last(), Some(PathEl::ClosePath)) {
                merged.close_path();
            }
            merged
        })
        .collect();

    tracing::debug!(paths = paths.len(), "traced bitmap");
    Ok(paths)
}

#[cfg(test)]
#[path = "../../tests/unit/export/trace.rs"]
mod tests;
