//! Codec interface used by [`PixelBuffer::load`](super::PixelBuffer::load)
//! and [`PixelBuffer::save`](super::PixelBuffer::save).
//!
//! Decoding and encoding are delegated to an injected [`ImageCodec`] so the
//! core never links a codec globally. The `image-io` feature provides
//! [`ImageCrateCodec`](super::io::ImageCrateCodec) on top of the `image`
//! crate.

use crate::util::{ImgProcError, ImgProcResult};
use std::path::Path;

/// JPEG quality used for every JPEG written by `PixelBuffer::save`.
pub const JPEG_QUALITY: u8 = 100;

/// Interleaved 8-bit pixels returned by [`ImageCodec::decode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Row-major interleaved bytes, `width * height * channels` long.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    /// Channel count as stored in the file.
    pub channels: usize,
}

/// External image codec.
pub trait ImageCodec {
    /// Decodes the file at `path` keeping its native channel count.
    fn decode(&self, path: &Path) -> ImgProcResult<DecodedImage>;

    /// Encodes interleaved pixels as JPEG with the given quality.
    fn encode_jpeg(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        quality: u8,
    ) -> ImgProcResult<Vec<u8>>;

    /// Encodes interleaved pixels as PNG; `stride` is the row pitch in bytes.
    fn encode_png(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> ImgProcResult<Vec<u8>>;
}

/// Output encoding selected from a file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// `.jpg` / `.jpeg`.
    Jpeg { quality: u8 },
    /// `.png`.
    Png,
}

impl OutputFormat {
    /// Picks the encoding from the extension of `path`, ignoring case.
    pub fn from_path(path: &Path) -> ImgProcResult<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg {
                quality: JPEG_QUALITY,
            }),
            Some("png") => Ok(OutputFormat::Png),
            _ => Err(ImgProcError::UnsupportedExtension {
                path: path.display().to_string(),
            }),
        }
    }
}
