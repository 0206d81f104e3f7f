//! Error types for the renderer and its inputs.

use thiserror::Error;

/// Everything that can go wrong before or around the per-pixel kernel.
///
/// The kernel itself never fails: invalid inputs are rejected when a
/// [`Camera`](crate::prism::camera::Camera) or
/// [`TraceSettings`](crate::prism::trace::TraceSettings) is built.
#[derive(Error, Debug)]
pub enum Error {
    /// Camera with a zero dimension
    #[error("Invalid camera {width}x{height}: width and height must be positive")]
    InvalidCamera { width: u32, height: u32 },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Malformed scene data (bad buffer length, non-finite values, ...)
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("Unknown scene preset: {0}")]
    UnknownPreset(String),

    /// Frame size does not match the renderer's output image
    #[error("Frame is {actual_width}x{actual_height} but the renderer holds {expected_width}x{expected_height}")]
    SizeMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// File extension we cannot read or write
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
