//! [`ImageCodec`] implementation backed by the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Only PNG and JPEG
//! support is compiled in.

use crate::image::codec::{DecodedImage, ImageCodec};
use crate::image::PixelBuffer;
use crate::util::{ImgProcError, ImgProcResult};
use ::image::codecs::jpeg::JpegEncoder;
use ::image::codecs::png::PngEncoder;
use ::image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::path::Path;

/// Codec that decodes and encodes through the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> ImgProcResult<DecodedImage> {
        let img = ::image::open(path).map_err(|err| ImgProcError::ImageIo {
            reason: format!("failed to open {}: {err}", path.display()),
        })?;
        Ok(decoded_from_dynamic(img))
    }

    fn encode_jpeg(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        quality: u8,
    ) -> ImgProcResult<Vec<u8>> {
        // JPEG has no alpha plane: keep luma or RGB only.
        let (pixels, channels) = match channels {
            2 => (drop_trailing_channels(pixels, 2, 1), 1),
            4 => (drop_trailing_channels(pixels, 4, 3), 3),
            _ => (pixels.to_vec(), channels),
        };
        let color = color_type(channels)?;
        let (w, h) = dims_u32(width, height)?;
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality)
            .write_image(&pixels, w, h, color)
            .map_err(encode_error)?;
        Ok(out)
    }

    fn encode_png(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> ImgProcResult<Vec<u8>> {
        let color = color_type(channels)?;
        let (w, h) = dims_u32(width, height)?;
        let row_len = width * channels;
        let packed;
        let pixels = if stride == row_len {
            pixels
        } else {
            packed = pack_rows(pixels, row_len, height, stride)?;
            packed.as_slice()
        };
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(pixels, w, h, color)
            .map_err(encode_error)?;
        Ok(out)
    }
}

/// Loads `path` with [`ImageCrateCodec`].
pub fn load_image<P: AsRef<Path>>(path: P) -> ImgProcResult<PixelBuffer> {
    PixelBuffer::load(&ImageCrateCodec, path)
}

/// Saves `buffer` to `path` with [`ImageCrateCodec`].
pub fn save_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> ImgProcResult<()> {
    buffer.save(&ImageCrateCodec, path)
}

fn decoded_from_dynamic(img: DynamicImage) -> DecodedImage {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let channels = img.color().channel_count() as usize;
    let data = match channels {
        1 => img.into_luma8().into_raw(),
        2 => img.into_luma_alpha8().into_raw(),
        4 => img.into_rgba8().into_raw(),
        _ => img.into_rgb8().into_raw(),
    };
    let channels = match channels {
        1 | 2 | 4 => channels,
        _ => 3,
    };
    DecodedImage {
        data,
        width,
        height,
        channels,
    }
}

fn color_type(channels: usize) -> ImgProcResult<ExtendedColorType> {
    match channels {
        1 => Ok(ExtendedColorType::L8),
        2 => Ok(ExtendedColorType::La8),
        3 => Ok(ExtendedColorType::Rgb8),
        4 => Ok(ExtendedColorType::Rgba8),
        _ => Err(ImgProcError::ImageIo {
            reason: format!("cannot encode {channels} channels"),
        }),
    }
}

fn dims_u32(width: usize, height: usize) -> ImgProcResult<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ImgProcError::InvalidDimensions {
            width,
            height,
            channels: 0,
        }),
    }
}

fn drop_trailing_channels(pixels: &[u8], from: usize, keep: usize) -> Vec<u8> {
    pixels
        .chunks_exact(from)
        .flat_map(|px| px[..keep].iter().copied())
        .collect()
}

fn pack_rows(pixels: &[u8], row_len: usize, height: usize, stride: usize) -> ImgProcResult<Vec<u8>> {
    let mut out = Vec::with_capacity(row_len * height);
    for y in 0..height {
        let start = y * stride;
        let row = pixels
            .get(start..start + row_len)
            .ok_or(ImgProcError::BufferSizeMismatch {
                needed: start + row_len,
                got: pixels.len(),
            })?;
        out.extend_from_slice(row);
    }
    Ok(out)
}

fn encode_error(err: ::image::ImageError) -> ImgProcError {
    ImgProcError::ImageIo {
        reason: err.to_string(),
    }
}
