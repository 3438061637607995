use crate::foundation::error::{FieldError, FieldResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// Side length of the square the lattice spans, centered on the origin.
pub const LATTICE_SPAN: f64 = 1.5;

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Immutable base position of one lattice sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticePoint {
    /// Base x coordinate.
    pub x0: f64,
    /// Base y coordinate.
    pub y0: f64,
}

/// Identifies one generated lattice. Render representations record the generation they were
/// sized for, so a buffer built for one lattice can never receive another lattice's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LatticeGeneration(pub u64);

/// Row-major `grid_size × grid_size` grid of base sample positions.
///
/// A lattice is never resized in place: changing resolution builds a new one.
#[derive(Clone, Debug)]
pub struct Lattice {
    grid_size: u32,
    generation: LatticeGeneration,
    points: Vec<LatticePoint>,
}

impl Lattice {
    /// Generate a lattice with `grid_size` points per side (`grid_size >= 2`).
    #[tracing::instrument(level = "debug")]
    pub fn new(grid_size: u32) -> FieldResult<Self> {
        if grid_size < 2 {
            return Err(FieldError::validation(format!(
                "lattice grid_size must be >= 2, got {grid_size}"
            )));
        }

        let n = grid_size as usize;
        let step = 1.0 / f64::from(grid_size - 1);
        let coord = |i: usize| ((i as f64) * step - 0.5) * LATTICE_SPAN;

        let mut points = Vec::with_capacity(n * n);
        for j in 0..n {
            let y0 = coord(j);
            for i in 0..n {
                points.push(LatticePoint { x0: coord(i), y0 });
            }
        }

        Ok(Self {
            grid_size,
            generation: LatticeGeneration(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)),
            points,
        })
    }

    /// Points per side.
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Generation id of this lattice.
    pub fn generation(&self) -> LatticeGeneration {
        self.generation
    }

    /// Total point count (`grid_size²`).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; a lattice has at least 4 points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Base points in row-major order.
    pub fn points(&self) -> &[LatticePoint] {
        &self.points
    }

    /// Base point at column `i`, row `j`.
    pub fn get(&self, i: u32, j: u32) -> Option<LatticePoint> {
        if i >= self.grid_size || j >= self.grid_size {
            return None;
        }
        let idx = (j as usize) * (self.grid_size as usize) + (i as usize);
        self.points.get(idx).copied()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/lattice.rs"]
mod tests;
