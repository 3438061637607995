//! Radial field displacement.
//!
//! The displacement of a lattice point depends only on its base position, the cycle time and the
//! field parameters. Nothing is carried between frames, so scrubbing to a time and playing up to it
//! produce the same output.

use crate::field::lattice::{Lattice, LatticePoint};
use crate::foundation::core::{AnimationTime, Vec3};
use crate::scene::params::FieldParams;
use rayon::prelude::*;

/// Spatial frequency of the in-plane (radial) wave.
const RADIAL_FREQUENCY: f64 = 10.0;
/// Spatial frequency of the out-of-plane wave.
const DEPTH_FREQUENCY: f64 = 5.0;
/// Both waves peak at half the field strength.
const AMPLITUDE_SCALE: f64 = 0.5;

/// Spin applied to instanced markers, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    /// Rotation about the X axis (applied first).
    pub rot_x: f64,
    /// Rotation about the Y axis.
    pub rot_y: f64,
}

/// Kernel output for one lattice point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisplacedPoint {
    /// Displaced position.
    pub position: Vec3,
    /// Marker spin; `None` for the point shape.
    pub orientation: Option<Orientation>,
}

/// Displace a single lattice point.
pub fn displace(point: LatticePoint, time: AnimationTime, field: &FieldParams) -> DisplacedPoint {
    let dx = point.x0 - field.center.x;
    let dy = point.y0 - field.center.y;
    let distance = (dx * dx + dy * dy).sqrt();
    let phase = time.phase();
    let amplitude = field.strength * AMPLITUDE_SCALE;

    let radial = (distance * RADIAL_FREQUENCY - phase).sin() * amplitude;
    let z = (distance * DEPTH_FREQUENCY - phase).sin() * amplitude;

    // The direction is undefined at the center; the point stays put in-plane there.
    let (x, y) = if distance > 0.0 {
        let angle = dy.atan2(dx);
        (
            point.x0 + angle.cos() * radial,
            point.y0 + angle.sin() * radial,
        )
    } else {
        (point.x0, point.y0)
    };

    let orientation = (!field.shape.is_point()).then(|| Orientation {
        rot_x: phase,
        rot_y: phase / 2.0,
    });

    DisplacedPoint {
        position: Vec3::new(x, y, z),
        orientation,
    }
}

/// Displace every lattice point into `out`, preserving lattice order.
///
/// With `parallel` set the points are evaluated on the rayon pool; the output is identical to the
/// sequential path.
pub fn displace_lattice(
    lattice: &Lattice,
    time: AnimationTime,
    field: &FieldParams,
    parallel: bool,
    out: &mut Vec<DisplacedPoint>,
) {
    let points = lattice.points();
    if parallel {
        points
            .par_iter()
            .map(|&p| displace(p, time, field))
            .collect_into_vec(out);
    } else {
        out.clear();
        out.extend(points.iter().map(|&p| displace(p, time, field)));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/kernel.rs"]
mod tests;
