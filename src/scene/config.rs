use crate::export::trace::TraceOpts;
use crate::foundation::core::Theme;
use crate::foundation::error::{FieldError, FieldResult};
use crate::render::camera::Camera;
use crate::render::cpu::CpuSurfaceOpts;
use crate::scene::params::FieldParams;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON scene description used by the command line tool.
///
/// Every field is optional; missing values take their defaults and out-of-range parameters are
/// clamped when the session applies them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Field parameters.
    pub params: FieldParams,
    /// Color theme.
    pub theme: Theme,
    /// Animation time in seconds; wrapped into the cycle.
    pub time: f64,
    /// Whether the clock starts paused.
    pub paused: bool,
    /// Output width in pixels.
    pub width: Option<u32>,
    /// Output height in pixels.
    pub height: Option<u32>,
    /// Camera override.
    pub camera: Option<Camera>,
    /// Tracing policy for vector export.
    pub trace: TraceOpts,
}

impl SceneConfig {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FieldResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FieldError::validation(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FieldResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FieldError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> FieldResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FieldError::serde(format!("serialize scene JSON: {e}")))
    }

    /// Surface options with this scene's overrides applied.
    pub fn surface_opts(&self) -> CpuSurfaceOpts {
        let base = CpuSurfaceOpts::default();
        let mut opts = base.with_size(
            self.width.unwrap_or(base.width),
            self.height.unwrap_or(base.height),
        );
        if let Some(camera) = self.camera {
            opts = opts.with_camera(camera);
        }
        opts
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
