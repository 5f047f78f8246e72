//! Error types for edgesketch.

use thiserror::Error;

/// Result alias for edgesketch operations.
pub type EdgeSketchResult<T> = std::result::Result<T, EdgeSketchError>;

/// Errors that can occur when running edgesketch algorithms.
///
/// Every variant is a precondition violation detected before any pixel is
/// computed; none of them is produced mid-algorithm.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdgeSketchError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// An owned pixel buffer does not hold exactly `width * height` elements.
    #[error("buffer length mismatch: expected {expected}, got {got}")]
    BufferLengthMismatch { expected: usize, got: usize },
    /// A borrowed buffer is too short for the requested view.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride: width={width}, stride={stride}")]
    InvalidStride { width: usize, stride: usize },
    /// A region does not fit inside the raster it addresses.
    #[error(
        "region out of bounds: x={x}, y={y}, width={width}, height={height}, image={img_width}x{img_height}"
    )]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Two rasters that must share dimensions do not.
    #[error(
        "dimension mismatch: expected {expected_width}x{expected_height}, got {got_width}x{got_height}"
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        got_width: usize,
        got_height: usize,
    },
    /// A numeric filter parameter is outside its valid range.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    /// A filter name did not match any known algorithm or preset.
    #[error("unknown filter: {name}")]
    UnknownFilter { name: String },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A rule list does not partition the raster into disjoint regions.
    #[error("regions do not tile the raster: {reason}")]
    RegionsNotTiling { reason: &'static str },
    /// Image decoding or encoding failed (feature `image-io`).
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
