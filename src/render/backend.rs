use crate::foundation::core::Theme;
use crate::foundation::error::FieldResult;
use crate::render::target::Representation;

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. Surfaces clear to an opaque background, so in practice the
/// bytes are also valid straight alpha.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Host-supplied styling that does not affect geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStyle {
    /// Light/dark flag; selects marker and background colors.
    pub theme: Theme,
}

/// The rendering surface the frame loop draws into.
///
/// Implementations own the camera and raster target. The core only hands over the active
/// [`Representation`] and style; it never inspects pixels except through [`RenderSurface::capture`].
pub trait RenderSurface {
    /// Whether the surface can draw yet (e.g. it has been mounted and sized).
    ///
    /// Frames are skipped, not failed, while this returns `false`.
    fn is_ready(&self) -> bool {
        true
    }

    /// Current pixel dimensions `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Draw one displayed frame.
    fn present(&mut self, repr: &Representation, style: &RenderStyle) -> FieldResult<()>;

    /// Force a render pass and read the result back.
    fn capture(&mut self, repr: &Representation, style: &RenderStyle) -> FieldResult<FrameRGBA>;
}
