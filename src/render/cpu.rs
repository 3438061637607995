use crate::foundation::core::{Point, Rgba8, Vec3};
use crate::foundation::error::{FieldError, FieldResult};
use crate::render::backend::{FrameRGBA, RenderStyle, RenderSurface};
use crate::render::camera::{Camera, Projector};
use crate::render::target::{InstancedMesh, PointCloud, Representation};
use serde::{Deserialize, Serialize};

/// Smallest on-screen sprite edge, in pixels.
const MIN_SPRITE_PX: f64 = 1.0;

/// Options for the CPU surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuSurfaceOpts {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Scene camera.
    pub camera: Camera,
}

impl Default for CpuSurfaceOpts {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
            camera: Camera::default(),
        }
    }
}

impl CpuSurfaceOpts {
    /// Return options with a different viewport size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Return options with a different camera.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }
}

fn dim_u16(v: u32, what: &str) -> FieldResult<u16> {
    match u16::try_from(v) {
        Ok(0) | Err(_) => Err(FieldError::validation(format!(
            "surface {what} must be in 1..={}, got {v}",
            u16::MAX
        ))),
        Ok(v) => Ok(v),
    }
}

/// Headless rendering surface rasterized with `vello_cpu`.
pub struct CpuSurface {
    opts: CpuSurfaceOpts,
    ctx: Option<vello_cpu::RenderContext>,
    pixmap: vello_cpu::Pixmap,
    frames_presented: u64,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("opts", &self.opts)
            .field("frames_presented", &self.frames_presented)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Create a surface. Fails when either dimension is 0 or exceeds `u16::MAX`.
    pub fn new(opts: CpuSurfaceOpts) -> FieldResult<Self> {
        let w = dim_u16(opts.width, "width")?;
        let h = dim_u16(opts.height, "height")?;
        Ok(Self {
            opts,
            ctx: None,
            pixmap: vello_cpu::Pixmap::new(w, h),
            frames_presented: 0,
        })
    }

    /// Resize the raster target. Later frames and captures use the new size.
    pub fn resize(&mut self, width: u32, height: u32) -> FieldResult<()> {
        let w = dim_u16(width, "width")?;
        let h = dim_u16(height, "height")?;
        self.opts.width = width;
        self.opts.height = height;
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        Ok(())
    }

    /// Surface options.
    pub fn opts(&self) -> &CpuSurfaceOpts {
        &self.opts
    }

    /// Number of frames drawn through [`RenderSurface::present`].
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Pixels of the most recent render pass.
    pub fn last_frame(&self) -> FrameRGBA {
        self.read_back()
    }

    fn read_back(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.opts.width,
            height: self.opts.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn render(&mut self, repr: &Representation, style: &RenderStyle) {
        let width = self.pixmap.width();
        let height = self.pixmap.height();
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_paint(cpu_color(style.theme.background_color()));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        let projector = Projector::new(&self.opts.camera, self.opts.width, self.opts.height);
        ctx.set_paint(cpu_color(style.theme.marker_color()));
        match repr {
            Representation::Points(cloud) => draw_points(&mut ctx, &projector, cloud),
            Representation::Instances(mesh) => draw_instances(&mut ctx, &projector, mesh),
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx = Some(ctx);
    }
}

impl RenderSurface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (self.opts.width, self.opts.height)
    }

    fn present(&mut self, repr: &Representation, style: &RenderStyle) -> FieldResult<()> {
        self.render(repr, style);
        self.frames_presented += 1;
        Ok(())
    }

    fn capture(&mut self, repr: &Representation, style: &RenderStyle) -> FieldResult<FrameRGBA> {
        self.render(repr, style);
        Ok(self.read_back())
    }
}

fn draw_points(ctx: &mut vello_cpu::RenderContext, projector: &Projector, cloud: &PointCloud) {
    for &[x, y, z] in cloud.positions() {
        let p = Vec3::new(f64::from(x), f64::from(y), f64::from(z));
        let (Some(c), Some(size)) = (
            projector.project(p),
            projector.project_size(p, cloud.point_size()),
        ) else {
            continue;
        };
        let half = size.max(MIN_SPRITE_PX) / 2.0;
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            c.x - half,
            c.y - half,
            c.x + half,
            c.y + half,
        ));
    }
}

fn draw_instances(ctx: &mut vello_cpu::RenderContext, projector: &Projector, mesh: &InstancedMesh) {
    let outline = mesh.geometry().outline();
    let mut projected: Vec<Point> = Vec::with_capacity(outline.len());
    for m in mesh.transforms() {
        projected.clear();
        projected.extend(
            outline
                .iter()
                .map_while(|&v| projector.project(m.transform_point(v))),
        );
        if projected.len() != outline.len() {
            continue;
        }

        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(cpu_point(projected[0]));
        for &p in &projected[1..] {
            path.line_to(cpu_point(p));
        }
        path.close_path();
        ctx.fill_path(&path);
    }
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn cpu_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
