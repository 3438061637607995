//! Fieldwave animates a square lattice of markers displaced by a radial wave field and exports
//! snapshots of it as vector graphics.
//!
//! # Pipeline overview
//!
//! 1. **Lattice**: `grid_size -> Lattice` (immutable base positions, rebuilt on resize)
//! 2. **Clock**: `Instant -> AnimationTime` (cyclic, pausable, seekable)
//! 3. **Kernel**: `Lattice + AnimationTime + FieldParams -> [DisplacedPoint]` (pure, per point)
//! 4. **Representation**: displaced points are written into a point cloud or an instanced mesh,
//!    depending on the marker shape
//! 5. **Surface**: a [`RenderSurface`] draws the representation ([`CpuSurface`] rasterizes on the CPU)
//! 6. **Export** (on demand): render once more, trace the bitmap, serialize an SVG document
//!
//! [`FieldSession`] wires these together and is the intended entry point.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the kernel is a pure function of its inputs; the clock only moves when ticked.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod export;
mod field;
mod foundation;
mod render;
mod scene;
mod session;

pub use animation::clock::{AnimationClock, ClockHandle, ClockState};
pub use export::pipeline::{ExportArtifact, ExportGuard, ExportJob, ExportPermit, vectorize};
pub use export::svg::{EXPORT_FILE_NAME, SVG_MIME_TYPE, VectorDocument};
pub use export::trace::{
    Bitmap, Polarity, TraceOpts, boundary_polygons, simplify_polygon, smooth_polygon, trace_bitmap,
};
pub use field::kernel::{DisplacedPoint, Orientation, displace, displace_lattice};
pub use field::lattice::{LATTICE_SPAN, Lattice, LatticeGeneration, LatticePoint};
pub use foundation::core::{
    AnimationTime, BezPath, CYCLE_DURATION, PathEl, Point, Rgba8, Theme, Vec3, wrap_cycle,
};
pub use foundation::error::{FieldError, FieldResult};
pub use foundation::math::Mat4;
pub use render::backend::{FrameRGBA, RenderStyle, RenderSurface};
pub use render::camera::Camera;
pub use render::cpu::{CpuSurface, CpuSurfaceOpts};
pub use render::target::{
    InstanceGeometry, InstancedMesh, PointCloud, RenderTarget, Representation, instance_transform,
};
pub use scene::config::SceneConfig;
pub use scene::params::{
    CENTER_LIMIT, FieldCenter, FieldParams, GRID_SIZE_MAX, GRID_SIZE_MIN, POINT_SIZE_MAX,
    POINT_SIZE_MIN, STRENGTH_MAX, Shape,
};
pub use session::field_session::{FieldSession, FrameOutcome, SessionOpts};
