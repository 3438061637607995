use crate::field::kernel::{DisplacedPoint, Orientation};
use crate::field::lattice::{Lattice, LatticeGeneration};
use crate::foundation::core::Vec3;
use crate::foundation::error::{FieldError, FieldResult};
use crate::foundation::math::Mat4;
use crate::scene::params::Shape;

/// Segment count of the circle outline used for sphere markers.
const CIRCLE_SEGMENTS: usize = 32;
/// Circumradius of the triangle and circle outlines.
const OUTLINE_RADIUS: f64 = 0.5;

/// Shared update contract of both render representations.
pub trait RenderTarget {
    /// Number of lattice slots this target was built for.
    fn len(&self) -> usize;

    /// Whether the target has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lattice generation this target was built for.
    fn generation(&self) -> LatticeGeneration;

    /// Write one frame of kernel output. Slot `i` receives `points[i]`.
    ///
    /// Fails without touching the buffer when `points.len()` differs from [`RenderTarget::len`].
    fn write_frame(&mut self, points: &[DisplacedPoint]) -> FieldResult<()>;

    /// Number of completed writes.
    fn revision(&self) -> u64;
}

fn check_len(expected: usize, got: usize) -> FieldResult<()> {
    if expected != got {
        return Err(FieldError::render(format!(
            "frame has {got} points but the representation was built for {expected}"
        )));
    }
    Ok(())
}

/// One position per lattice point, rewritten in place every frame.
#[derive(Clone, Debug)]
pub struct PointCloud {
    generation: LatticeGeneration,
    positions: Vec<[f32; 3]>,
    point_size: f64,
    revision: u64,
}

impl PointCloud {
    /// Build a cloud seeded with the undisplaced lattice.
    pub fn new(lattice: &Lattice, point_size: f64) -> Self {
        Self {
            generation: lattice.generation(),
            positions: lattice
                .points()
                .iter()
                .map(|p| [p.x0 as f32, p.y0 as f32, 0.0])
                .collect(),
            point_size,
            revision: 0,
        }
    }

    /// Position buffer in lattice order.
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Sprite size in scene units.
    pub fn point_size(&self) -> f64 {
        self.point_size
    }
}

impl RenderTarget for PointCloud {
    fn len(&self) -> usize {
        self.positions.len()
    }

    fn generation(&self) -> LatticeGeneration {
        self.generation
    }

    fn write_frame(&mut self, points: &[DisplacedPoint]) -> FieldResult<()> {
        check_len(self.positions.len(), points.len())?;
        for (slot, p) in self.positions.iter_mut().zip(points) {
            *slot = p.position.to_f32_array();
        }
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Flat outline drawn for each instance, in instance-local units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstanceGeometry {
    /// Unit square (cube markers).
    Square,
    /// Equilateral triangle (tetrahedron markers).
    Triangle,
    /// Regular polygon approximating a circle (sphere markers).
    Circle,
}

impl InstanceGeometry {
    /// Outline for an instanced shape; `None` for [`Shape::Point`].
    pub fn for_shape(shape: Shape) -> Option<Self> {
        match shape {
            Shape::Point => None,
            Shape::Cube => Some(Self::Square),
            Shape::Tetrahedron => Some(Self::Triangle),
            Shape::Sphere => Some(Self::Circle),
        }
    }

    /// Outline vertices in the z = 0 plane, counter-clockwise.
    pub fn outline(self) -> Vec<Vec3> {
        match self {
            Self::Square => vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
            ],
            Self::Triangle => regular_polygon(3),
            Self::Circle => regular_polygon(CIRCLE_SEGMENTS),
        }
    }
}

fn regular_polygon(segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|k| {
            let a = (k as f64) / (segments as f64) * std::f64::consts::TAU;
            Vec3::new(OUTLINE_RADIUS * a.cos(), OUTLINE_RADIUS * a.sin(), 0.0)
        })
        .collect()
}

/// Composed instance transform: `translate · scale · rotateX · rotateY`.
pub fn instance_transform(position: Vec3, scale: f64, orientation: Orientation) -> Mat4 {
    Mat4::translation(position)
        * Mat4::scale(scale)
        * Mat4::rotation_x(orientation.rot_x)
        * Mat4::rotation_y(orientation.rot_y)
}

/// One transform per lattice point, each drawing [`InstanceGeometry`].
#[derive(Clone, Debug)]
pub struct InstancedMesh {
    generation: LatticeGeneration,
    geometry: InstanceGeometry,
    transforms: Vec<Mat4>,
    point_size: f64,
    revision: u64,
}

impl InstancedMesh {
    /// Build a mesh with one instance per lattice point, placed at the undisplaced lattice.
    pub fn new(lattice: &Lattice, geometry: InstanceGeometry, point_size: f64) -> Self {
        let transforms = lattice
            .points()
            .iter()
            .map(|p| {
                instance_transform(Vec3::new(p.x0, p.y0, 0.0), point_size, Orientation::default())
            })
            .collect();
        Self {
            generation: lattice.generation(),
            geometry,
            transforms,
            point_size,
            revision: 0,
        }
    }

    /// Outline drawn per instance.
    pub fn geometry(&self) -> InstanceGeometry {
        self.geometry
    }

    /// Instance transforms in lattice order.
    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    /// Instance scale.
    pub fn point_size(&self) -> f64 {
        self.point_size
    }

    /// Flattened single precision instance buffer (16 floats per instance).
    pub fn instance_buffer(&self) -> Vec<f32> {
        self.transforms
            .iter()
            .flat_map(|m| m.to_f32_array())
            .collect()
    }
}

impl RenderTarget for InstancedMesh {
    fn len(&self) -> usize {
        self.transforms.len()
    }

    fn generation(&self) -> LatticeGeneration {
        self.generation
    }

    fn write_frame(&mut self, points: &[DisplacedPoint]) -> FieldResult<()> {
        check_len(self.transforms.len(), points.len())?;
        for (slot, p) in self.transforms.iter_mut().zip(points) {
            *slot = instance_transform(
                p.position,
                self.point_size,
                p.orientation.unwrap_or_default(),
            );
        }
        self.revision += 1;
        Ok(())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// The active render representation, chosen once per shape.
#[derive(Clone, Debug)]
pub enum Representation {
    /// Point shape.
    Points(PointCloud),
    /// Every other shape.
    Instances(InstancedMesh),
}

impl Representation {
    /// Build the representation for `shape`, sized for `lattice`.
    pub fn for_shape(shape: Shape, lattice: &Lattice, point_size: f64) -> Self {
        match InstanceGeometry::for_shape(shape) {
            None => Self::Points(PointCloud::new(lattice, point_size)),
            Some(geometry) => Self::Instances(InstancedMesh::new(lattice, geometry, point_size)),
        }
    }

    /// Whether this representation can display `shape` without a rebuild.
    pub fn matches_shape(&self, shape: Shape) -> bool {
        match self {
            Self::Points(_) => shape.is_point(),
            Self::Instances(m) => InstanceGeometry::for_shape(shape) == Some(m.geometry),
        }
    }

    /// Update marker size. Takes effect from the next written frame.
    pub fn set_point_size(&mut self, point_size: f64) {
        match self {
            Self::Points(c) => c.point_size = point_size,
            Self::Instances(m) => m.point_size = point_size,
        }
    }

    fn target(&self) -> &dyn RenderTarget {
        match self {
            Self::Points(c) => c,
            Self::Instances(m) => m,
        }
    }

    fn target_mut(&mut self) -> &mut dyn RenderTarget {
        match self {
            Self::Points(c) => c,
            Self::Instances(m) => m,
        }
    }
}

impl RenderTarget for Representation {
    fn len(&self) -> usize {
        self.target().len()
    }

    fn generation(&self) -> LatticeGeneration {
        self.target().generation()
    }

    fn write_frame(&mut self, points: &[DisplacedPoint]) -> FieldResult<()> {
        self.target_mut().write_frame(points)
    }

    fn revision(&self) -> u64 {
        self.target().revision()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
