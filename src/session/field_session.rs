use crate::animation::clock::{AnimationClock, ClockHandle};
use crate::export::pipeline::{ExportArtifact, ExportGuard, ExportJob};
use crate::export::trace::TraceOpts;
use crate::field::kernel::{DisplacedPoint, displace_lattice};
use crate::field::lattice::Lattice;
use crate::foundation::core::{AnimationTime, Theme};
use crate::foundation::error::{FieldError, FieldResult};
use crate::render::backend::{FrameRGBA, RenderStyle, RenderSurface};
use crate::render::target::{RenderTarget, Representation};
use crate::scene::params::FieldParams;
use std::time::Instant;

/// Options controlling per-frame evaluation and export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionOpts {
    /// Evaluate the kernel on the rayon pool for large lattices.
    pub parallel: bool,
    /// Minimum point count before the parallel path is used.
    pub parallel_threshold: usize,
    /// Tracing policy for vector export.
    pub trace: TraceOpts,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 4096,
            trace: TraceOpts::default(),
        }
    }
}

/// What [`FieldSession::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn to the attached surface.
    Presented,
    /// No surface was attached or it was not ready; buffers were still updated.
    Skipped,
}

/// Owns the lattice, the active representation and the clock, and drives them once per frame.
///
/// The session is single-threaded; the clock is shared through [`ClockHandle`] so controls on other
/// threads can pause, resume or seek it.
pub struct FieldSession {
    params: FieldParams,
    theme: Theme,
    opts: SessionOpts,
    lattice: Lattice,
    representation: Representation,
    displaced: Vec<DisplacedPoint>,
    clock: ClockHandle,
    surface: Option<Box<dyn RenderSurface>>,
    export_guard: ExportGuard,
}

impl std::fmt::Debug for FieldSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSession")
            .field("params", &self.params)
            .field("theme", &self.theme)
            .field("points", &self.lattice.len())
            .field("has_surface", &self.surface.is_some())
            .finish_non_exhaustive()
    }
}

impl FieldSession {
    /// Create a session with a running clock at time 0 and no surface.
    ///
    /// `params` are clamped first.
    pub fn new(params: FieldParams, opts: SessionOpts) -> FieldResult<Self> {
        Self::with_clock(params, opts, ClockHandle::new(AnimationClock::new()))
    }

    /// Create a session driven by an existing clock.
    pub fn with_clock(params: FieldParams, opts: SessionOpts, clock: ClockHandle) -> FieldResult<Self> {
        let params = params.clamped();
        let lattice = Lattice::new(params.grid_size)?;
        let representation = Representation::for_shape(params.shape, &lattice, params.point_size);
        let mut session = Self {
            params,
            theme: Theme::default(),
            opts,
            lattice,
            representation,
            displaced: Vec::new(),
            clock,
            surface: None,
            export_guard: ExportGuard::default(),
        };
        session.refresh()?;
        Ok(session)
    }

    /// Current (clamped) parameters.
    pub fn params(&self) -> &FieldParams {
        &self.params
    }

    /// Apply new parameters.
    ///
    /// Values are clamped. A grid change rebuilds the lattice and representation, a shape change
    /// swaps the representation, and a point size change updates it in place. Buffers are refreshed
    /// at the current clock time without advancing it.
    pub fn set_params(&mut self, params: FieldParams) -> FieldResult<()> {
        let params = params.clamped();
        if params.grid_size != self.lattice.grid_size() {
            self.lattice = Lattice::new(params.grid_size)?;
            self.representation =
                Representation::for_shape(params.shape, &self.lattice, params.point_size);
            tracing::debug!(grid_size = params.grid_size, "rebuilt lattice");
        } else if !self.representation.matches_shape(params.shape) {
            self.representation =
                Representation::for_shape(params.shape, &self.lattice, params.point_size);
            tracing::debug!(shape = ?params.shape, "switched representation");
        } else if params.point_size != self.params.point_size {
            self.representation.set_point_size(params.point_size);
        }
        self.params = params;
        self.refresh()
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Change the theme. Affects colors only.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Session options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Attach a surface, returning the previous one.
    pub fn attach_surface(
        &mut self,
        surface: Box<dyn RenderSurface>,
    ) -> Option<Box<dyn RenderSurface>> {
        self.surface.replace(surface)
    }

    /// Detach the surface. Later frames are skipped and exports fail.
    pub fn detach_surface(&mut self) -> Option<Box<dyn RenderSurface>> {
        self.surface.take()
    }

    /// The attached surface, if any.
    pub fn surface(&self) -> Option<&dyn RenderSurface> {
        self.surface.as_deref()
    }

    /// Shared handle to the animation clock.
    pub fn clock(&self) -> &ClockHandle {
        &self.clock
    }

    /// The base lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Displaced positions from the most recent evaluation, in lattice order.
    pub fn displaced(&self) -> &[DisplacedPoint] {
        &self.displaced
    }

    /// The active render representation.
    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    /// Whether an export currently holds the export guard.
    pub fn is_exporting(&self) -> bool {
        self.export_guard.is_busy()
    }

    /// Run one frame: tick the clock, displace the lattice, write the representation and present it.
    ///
    /// Without a ready surface the buffers are still updated and the frame is reported as skipped.
    pub fn frame(&mut self, now: Instant) -> FieldResult<FrameOutcome> {
        let time = self.clock.tick(now);
        self.update(time)?;

        let style = self.style();
        match self.surface.as_mut() {
            Some(surface) if surface.is_ready() => {
                surface.present(&self.representation, &style)?;
                Ok(FrameOutcome::Presented)
            }
            _ => {
                tracing::trace!(t = time.value, "no ready surface, frame skipped");
                Ok(FrameOutcome::Skipped)
            }
        }
    }

    /// Render the current state at the current clock time, without advancing it, and read it back.
    pub fn capture(&mut self) -> FieldResult<FrameRGBA> {
        if !self.surface.as_ref().is_some_and(|s| s.is_ready()) {
            return Err(FieldError::render("no ready render surface"));
        }
        self.refresh()?;
        let style = self.style();
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| FieldError::render("no ready render surface"))?;
        surface.capture(&self.representation, &style)
    }

    /// Capture the current state for export.
    ///
    /// Fails if another export is in flight or no ready surface is attached.
    pub fn begin_export(&mut self) -> FieldResult<ExportJob> {
        let permit = self
            .export_guard
            .try_acquire()
            .ok_or_else(|| FieldError::render("an export is already in progress"))?;
        let frame = self.capture()?;
        tracing::debug!(w = frame.width, h = frame.height, "svg export started");
        Ok(ExportJob::new(frame, self.theme, self.opts.trace, permit))
    }

    /// Capture, trace and serialize in one call.
    pub fn try_export_svg(&mut self) -> FieldResult<ExportArtifact> {
        self.begin_export()?.run()
    }

    /// Like [`FieldSession::try_export_svg`], but failures are logged and yield `None`.
    pub fn export_svg(&mut self) -> Option<ExportArtifact> {
        match self.try_export_svg() {
            Ok(artifact) => Some(artifact),
            Err(err) => {
                tracing::warn!(error = %err, "svg export aborted");
                None
            }
        }
    }

    fn style(&self) -> RenderStyle {
        RenderStyle { theme: self.theme }
    }

    fn refresh(&mut self) -> FieldResult<()> {
        let time = self.clock.time();
        self.update(time)
    }

    fn update(&mut self, time: AnimationTime) -> FieldResult<()> {
        if self.representation.generation() != self.lattice.generation() {
            return Err(FieldError::render(
                "representation was built for a different lattice",
            ));
        }
        let parallel = self.opts.parallel && self.lattice.len() >= self.opts.parallel_threshold;
        displace_lattice(
            &self.lattice,
            time,
            &self.params,
            parallel,
            &mut self.displaced,
        );
        self.representation.write_frame(&self.displaced)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/field_session.rs"]
mod tests;
