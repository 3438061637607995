pub use kurbo::{BezPath, PathEl, Point};

/// Length of one animation cycle, in seconds.
///
/// Shared by the animation clock (wrap point) and the displacement kernel (phase period). Both
/// read this single value; changing it anywhere else desynchronizes playback from field motion.
pub const CYCLE_DURATION: f64 = 10.0;

/// Position within the animation cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationTime {
    /// Seconds into the cycle, always in `[0, CYCLE_DURATION)`.
    pub value: f64,
    /// Whether the clock that produced this value is paused.
    pub paused: bool,
}

impl AnimationTime {
    /// Build a running time value, wrapping `value` into the cycle.
    pub fn at(value: f64) -> Self {
        Self {
            value: wrap_cycle(value),
            paused: false,
        }
    }

    /// Phase angle of this time within the cycle, in radians `[0, 2π)`.
    pub fn phase(self) -> f64 {
        (self.value / CYCLE_DURATION) * std::f64::consts::TAU
    }
}

/// Wrap seconds into `[0, CYCLE_DURATION)`. Non-finite input maps to `0`.
pub fn wrap_cycle(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let v = value.rem_euclid(CYCLE_DURATION);
    // rem_euclid can round up to the divisor for tiny negative inputs.
    if v >= CYCLE_DURATION { 0.0 } else { v }
}

/// 3D vector in scene units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component (towards the camera).
    pub z: f64,
}

impl Vec3 {
    /// Construct a vector.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Single precision array, as stored in render buffers.
    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB channels.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb` hex string, alpha ignored.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Rec. 601 luma of the color channels.
    pub fn luma(self) -> u8 {
        let y = 299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b);
        ((y + 500) / 1000) as u8
    }
}

/// Light/dark theme flag supplied by the host. Affects colors only, never geometry.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    /// Black markers on white.
    #[default]
    Light,
    /// White markers on near-black.
    Dark,
}

impl Theme {
    /// Marker (point/instance) color.
    pub fn marker_color(self) -> Rgba8 {
        match self {
            Theme::Light => Rgba8::opaque(0, 0, 0),
            Theme::Dark => Rgba8::opaque(255, 255, 255),
        }
    }

    /// Surface clear color.
    pub fn background_color(self) -> Rgba8 {
        match self {
            Theme::Light => Rgba8::opaque(0xff, 0xff, 0xff),
            Theme::Dark => Rgba8::opaque(0x1a, 0x1a, 0x1a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
