//! Error types for imgproc.

use thiserror::Error;

/// Result alias for imgproc operations.
pub type ImgProcResult<T> = std::result::Result<T, ImgProcError>;

/// Errors that can occur when loading, saving or processing images.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ImgProcError {
    /// The codec failed to read, decode, encode or write an image.
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
    /// The output path does not end in `.jpg`, `.jpeg` or `.png`.
    #[error("unsupported output extension: {path}")]
    UnsupportedExtension { path: String },
    /// Buffer dimensions are zero or overflow `usize`.
    #[error("invalid dimensions {width}x{height}x{channels}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },
    /// A raw byte vector does not match the declared dimensions.
    #[error("buffer size mismatch: needed {needed} bytes, got {got}")]
    BufferSizeMismatch { needed: usize, got: usize },
    /// The pixel storage could not be reserved.
    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },
    /// The buffer was released or never allocated.
    #[error("buffer is empty")]
    EmptyBuffer,
    /// The operation needs at least three interleaved channels.
    #[error("the input image must have at least 3 channels, got {channels}")]
    InsufficientChannels { channels: usize },
    /// The image exceeds the pixel cap of the direct Fourier transform.
    #[error("image too large: {pixels} pixels exceeds the limit of {max}")]
    ImageTooLarge { pixels: usize, max: usize },
    /// Pixel coordinates fall outside the buffer.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    PixelOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Object-detection precision outside `[0, 10]`.
    #[error("precision must be in range [0, 10], got {precision}")]
    PrecisionOutOfRange { precision: i32 },
}
