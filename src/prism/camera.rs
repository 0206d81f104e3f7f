use crate::error::{Error, Result};

/// Output resolution for one frame.
///
/// Only constructible through [`Camera::new`], so `height > 0` always holds
/// and [`Camera::aspect_ratio`] never divides by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    width: u32,
    height: u32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidCamera { width, height });
        }

        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Number of distinct jitter seeds before the pattern repeats.
pub const SEED_PERIOD: f32 = 20.0;

/// Wall-clock time handed over by the host once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time {
    pub elapsed_ms: f32,
}

impl Time {
    pub fn from_millis(elapsed_ms: f32) -> Self {
        Self { elapsed_ms }
    }

    /// `(floor(elapsed_ms) mod 20) / 20`, always in `[0, 1)`.
    ///
    /// Negative or non-finite times map to seed 0.
    pub fn seed(&self) -> f32 {
        if !self.elapsed_ms.is_finite() {
            return 0.0;
        }
        self.elapsed_ms.floor().rem_euclid(SEED_PERIOD) / SEED_PERIOD
    }
}
