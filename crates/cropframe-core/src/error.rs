//! Error types for the crop engine.

use thiserror::Error;

/// Errors surfaced by cropper operations.
///
/// Rejected pan/zoom components and degenerate two-touch gestures are not
/// errors: they are resolved per event and never leave the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// A crop or geometry was requested before a texture was loaded.
    #[error("No texture loaded")]
    NoTexture,

    /// A crop was requested before the frame was sized.
    #[error("Frame size not set")]
    NoFrame,

    /// The texture has a zero dimension.
    #[error("Invalid texture size: {width}x{height}")]
    InvalidTexture { width: u32, height: u32 },

    /// The frame size is non-finite or not positive.
    #[error("Invalid frame size: {width}x{height}")]
    InvalidFrame { width: f64, height: f64 },

    /// A crop rectangle with zero width or height.
    #[error("Crop rectangle is empty")]
    EmptyCrop,

    /// Configuration values out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
