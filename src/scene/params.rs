use serde::{Deserialize, Serialize};

/// Smallest accepted lattice resolution at the parameter boundary.
pub const GRID_SIZE_MIN: u32 = 50;
/// Largest accepted lattice resolution at the parameter boundary.
pub const GRID_SIZE_MAX: u32 = 200;
/// Point size floor.
pub const POINT_SIZE_MIN: f64 = 0.001;
/// Point size ceiling.
pub const POINT_SIZE_MAX: f64 = 0.1;
/// Field strength ceiling (floor is 0).
pub const STRENGTH_MAX: f64 = 0.5;
/// Field center coordinates are clamped into `[-CENTER_LIMIT, CENTER_LIMIT]`.
pub const CENTER_LIMIT: f64 = 1.0;

/// Marker shape drawn at every lattice point.
///
/// `Point` uses the point-cloud representation; every other shape is drawn as one transformed
/// instance per lattice point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Square point sprites.
    #[default]
    Point,
    /// Unit square instances.
    Cube,
    /// Triangle instances.
    Tetrahedron,
    /// Circle instances.
    Sphere,
}

impl Shape {
    /// All shapes in control-layer index order.
    pub const ALL: [Shape; 4] = [Shape::Point, Shape::Cube, Shape::Tetrahedron, Shape::Sphere];

    /// Map a control-layer index (`0..=3`) to a shape. Out-of-range indices clamp to the last shape.
    pub fn from_index(idx: u32) -> Shape {
        Self::ALL[(idx as usize).min(Self::ALL.len() - 1)]
    }

    /// Control-layer index of this shape.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Whether this shape uses the point-cloud representation.
    pub fn is_point(self) -> bool {
        matches!(self, Shape::Point)
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "snake_case")]
        enum Named {
            Point,
            Cube,
            Tetrahedron,
            Sphere,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Index(u32),
            Name(Named),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Index(i) => Shape::from_index(i),
            Repr::Name(Named::Point) => Shape::Point,
            Repr::Name(Named::Cube) => Shape::Cube,
            Repr::Name(Named::Tetrahedron) => Shape::Tetrahedron,
            Repr::Name(Named::Sphere) => Shape::Sphere,
        })
    }
}

/// Center of the radial field in normalized lattice space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct FieldCenter {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl FieldCenter {
    /// Construct a center.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl<'de> Deserialize<'de> for FieldCenter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

/// Parameters produced by the control layer and read by the core every frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldParams {
    /// Lattice resolution per side.
    pub grid_size: u32,
    /// Marker size in scene units.
    pub point_size: f64,
    /// Displacement amplitude.
    pub strength: f64,
    /// Field center.
    pub center: FieldCenter,
    /// Marker shape.
    pub shape: Shape,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            grid_size: 100,
            point_size: 0.01,
            strength: 0.02,
            center: FieldCenter::default(),
            shape: Shape::Point,
        }
    }
}

impl FieldParams {
    /// Clamp every field into its accepted range.
    ///
    /// Out-of-range values are pulled to the nearest bound; non-finite values fall back to the
    /// default for that field.
    pub fn clamped(self) -> Self {
        let d = Self::default();
        let clamp_f = |v: f64, lo: f64, hi: f64, fallback: f64| {
            if v.is_finite() { v.clamp(lo, hi) } else { fallback }
        };

        Self {
            grid_size: self.grid_size.clamp(GRID_SIZE_MIN, GRID_SIZE_MAX),
            point_size: clamp_f(self.point_size, POINT_SIZE_MIN, POINT_SIZE_MAX, d.point_size),
            strength: clamp_f(self.strength, 0.0, STRENGTH_MAX, d.strength),
            center: FieldCenter {
                x: clamp_f(self.center.x, -CENTER_LIMIT, CENTER_LIMIT, d.center.x),
                y: clamp_f(self.center.y, -CENTER_LIMIT, CENTER_LIMIT, d.center.y),
            },
            shape: self.shape,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/params.rs"]
mod tests;
