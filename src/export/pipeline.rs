use crate::export::svg::{EXPORT_FILE_NAME, SVG_MIME_TYPE, VectorDocument};
use crate::export::trace::{Bitmap, Polarity, TraceOpts, trace_bitmap};
use crate::foundation::core::{Rgba8, Theme};
use crate::foundation::error::{FieldError, FieldResult};
use crate::render::backend::FrameRGBA;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Finished export: a downloadable byte stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Serialized document.
    pub bytes: Vec<u8>,
}

/// Admits at most one export at a time.
#[derive(Clone, Debug, Default)]
pub struct ExportGuard {
    busy: Arc<AtomicBool>,
}

impl ExportGuard {
    /// Claim the guard. Returns `None` while another permit is alive.
    pub fn try_acquire(&self) -> Option<ExportPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Whether an export currently holds the guard.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of an in-flight export; releases the guard on drop.
#[derive(Debug)]
pub struct ExportPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// A captured frame waiting to be traced.
///
/// Capturing must happen on the thread that owns the surface; the job itself is `Send` and can be
/// run anywhere. The export guard stays held until the job is run or dropped.
#[derive(Debug)]
pub struct ExportJob {
    frame: FrameRGBA,
    theme: Theme,
    opts: TraceOpts,
    _permit: ExportPermit,
}

impl ExportJob {
    pub(crate) fn new(frame: FrameRGBA, theme: Theme, opts: TraceOpts, permit: ExportPermit) -> Self {
        Self {
            frame,
            theme,
            opts,
            _permit: permit,
        }
    }

    /// The captured frame.
    pub fn frame(&self) -> &FrameRGBA {
        &self.frame
    }

    /// Trace and serialize.
    #[tracing::instrument(level = "debug", skip_all, fields(w = self.frame.width, h = self.frame.height))]
    pub fn run(self) -> FieldResult<ExportArtifact> {
        let doc = vectorize(&self.frame, self.theme, &self.opts)?;
        let bytes = doc.to_svg_string().into_bytes();
        tracing::debug!(
            contours = doc.contour_count(),
            bytes = bytes.len(),
            "svg export finished"
        );
        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME.to_owned(),
            mime_type: SVG_MIME_TYPE.to_owned(),
            bytes,
        })
    }

    /// Run on a new thread.
    pub fn spawn(self) -> std::thread::JoinHandle<FieldResult<ExportArtifact>> {
        std::thread::spawn(move || self.run())
    }
}

/// Trace the markers of a rendered frame into a vector document.
///
/// Markers are whatever contrasts with the theme background: light pixels on the dark theme,
/// dark pixels on the light theme.
pub fn vectorize(frame: &FrameRGBA, theme: Theme, opts: &TraceOpts) -> FieldResult<VectorDocument> {
    if frame.width == 0 || frame.height == 0 {
        return Err(FieldError::trace("cannot trace an empty frame"));
    }
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(FieldError::trace(format!(
            "frame buffer has {} bytes, expected {}x{}x4",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    let flat = flatten_over_background(frame, theme.background_color());
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, flat)
        .ok_or_else(|| FieldError::trace("frame buffer does not match its dimensions"))?;
    let luma = image::DynamicImage::ImageRgba8(rgba).into_luma8();

    let polarity = if theme.background_color().luma() < opts.threshold {
        Polarity::Light
    } else {
        Polarity::Dark
    };
    let bitmap = Bitmap::from_luma(&luma, opts.threshold, polarity);
    let paths = trace_bitmap(&bitmap, opts)?;

    Ok(VectorDocument {
        width: frame.width,
        height: frame.height,
        paths,
        fill: theme.marker_color(),
    })
}

/// Composite `frame` over an opaque `bg`, honoring `frame.premultiplied`. Output is opaque RGBA8.
fn flatten_over_background(frame: &FrameRGBA, bg: Rgba8) -> Vec<u8> {
    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    let mut out = vec![0u8; frame.data.len()];
    for (d, s) in out.chunks_exact_mut(4).zip(frame.data.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d[..3].copy_from_slice(&s[..3]);
        } else {
            let inv = 255 - a;
            for c in 0..3 {
                let src = if frame.premultiplied {
                    u16::from(s[c])
                } else {
                    mul_div255(u16::from(s[c]), a)
                };
                d[c] = (src + mul_div255(bg[c], inv)).min(255) as u8;
            }
        }
        d[3] = 255;
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u16 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
