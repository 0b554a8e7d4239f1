//! Error Types
//!
//! Configuration is the only fallible part of the collision core. Queries never
//! fail: degenerate inputs simply produce "no hit" or an empty cull.

use thiserror::Error;

/// Malformed height map configuration.
///
/// Returned synchronously by `configure`; the previously configured field is
/// left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidArgument {
    /// `heights.len()` does not equal `width * depth`.
    #[error("height sample count mismatch: expected {expected} ({width}x{depth}), got {got}")]
    DimensionMismatch {
        /// Number of samples along X.
        width: usize,
        /// Number of samples along Z.
        depth: usize,
        /// `width * depth`.
        expected: usize,
        /// Number of samples supplied.
        got: usize,
    },

    /// Width or depth is zero.
    #[error("height map dimensions must be at least 1x1, got {width}x{depth}")]
    ZeroDimension {
        /// Requested width.
        width: usize,
        /// Requested depth.
        depth: usize,
    },

    /// Cell size below the supported minimum.
    #[error("cell size {cell_size} is below the minimum of {min}")]
    CellSizeTooSmall {
        /// Requested cell size.
        cell_size: f32,
        /// Smallest accepted cell size.
        min: f32,
    },

    /// Cell size is NaN or infinite.
    #[error("cell size must be finite, got {0}")]
    NonFiniteCellSize(f32),

    /// `min_height > max_height`.
    #[error("inverted height range: min {min} > max {max}")]
    InvertedHeightRange {
        /// Lower bound supplied.
        min: f32,
        /// Upper bound supplied.
        max: f32,
    },
}

/// Errors surfaced by the data import layer (JSON, images, files).
#[derive(Error, Debug)]
pub enum HeightMapError {
    /// The decoded data describes an invalid height map.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The image has no single-channel height interpretation.
    #[error("unsupported height image format: {0:?}")]
    UnsupportedImageFormat(image::ColorType),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
