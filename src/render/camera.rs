use crate::foundation::core::{Point, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera on the +Z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Camera distance from the origin along +Z.
    pub distance: f64,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
    /// Points closer than this (along the view axis) are not drawn.
    pub near: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            distance: 2.0,
            fov_y_deg: 75.0,
            near: 0.1,
        }
    }
}

/// A camera bound to a viewport size.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projector {
    distance: f64,
    near: f64,
    focal: f64,
    half_w: f64,
    half_h: f64,
}

impl Projector {
    pub(crate) fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let half_fov = (camera.fov_y_deg.clamp(1.0, 179.0) / 2.0).to_radians();
        Self {
            distance: camera.distance,
            near: camera.near,
            // Pixels per scene unit at depth 1.
            focal: f64::from(height) / 2.0 / half_fov.tan(),
            half_w: f64::from(width) / 2.0,
            half_h: f64::from(height) / 2.0,
        }
    }

    fn depth(&self, p: Vec3) -> Option<f64> {
        let d = self.distance - p.z;
        (d >= self.near).then_some(d)
    }

    /// Screen position in pixels (y down), or `None` behind the near plane.
    pub(crate) fn project(&self, p: Vec3) -> Option<Point> {
        let d = self.depth(p)?;
        Some(Point::new(
            self.half_w + p.x * self.focal / d,
            self.half_h - p.y * self.focal / d,
        ))
    }

    /// On-screen size in pixels of a length `size` at the depth of `p`.
    pub(crate) fn project_size(&self, p: Vec3, size: f64) -> Option<f64> {
        Some(size * self.focal / self.depth(p)?)
    }
}
