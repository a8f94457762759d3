//! Owned interleaved pixel buffers.
//!
//! `PixelBuffer` stores `width * height * channels` bytes in row-major,
//! channel-interleaved order: the stride between rows is
//! `width * channels`. The way the bytes were obtained is tracked by an
//! explicit [`Allocation`] tag; [`PixelBuffer::release`] matches on it to
//! pick the release path and leaves the buffer empty, so repeated releases
//! are no-ops and released buffers are rejected by every operation.

use crate::trace::trace_event;
use crate::util::{ImgProcError, ImgProcResult};
use std::path::Path;

pub mod codec;
#[cfg(feature = "image-io")]
pub mod io;
pub mod pixel;

use codec::{DecodedImage, ImageCodec, OutputFormat};

/// Marker byte of buffers created with `zeroed = false`.
pub const UNZEROED_FILL: u8 = 0xCD;

/// How the bytes of a buffer were acquired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Allocation {
    /// No storage is held.
    None,
    /// Allocated by [`PixelBuffer::create`] or wrapped by [`PixelBuffer::from_raw`].
    SelfAllocated,
    /// Produced by an [`ImageCodec`] while decoding a file.
    CodecAllocated,
}

impl Allocation {
    fn as_str(self) -> &'static str {
        match self {
            Allocation::None => "none",
            Allocation::SelfAllocated => "self",
            Allocation::CodecAllocated => "codec",
        }
    }
}

#[derive(Debug)]
enum Storage {
    Empty,
    Owned(Vec<u8>),
    Decoded(Vec<u8>),
}

/// Owned pixel buffer with width, height and channel metadata.
#[derive(Debug)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    channels: usize,
    storage: Storage,
}

impl PixelBuffer {
    /// Allocates a `width x height x channels` buffer.
    ///
    /// When `zeroed` is true every byte is guaranteed to be zero. Otherwise
    /// the contents are unspecified and callers must write every byte they
    /// read; the buffer is currently filled with [`UNZEROED_FILL`].
    pub fn create(
        width: usize,
        height: usize,
        channels: usize,
        zeroed: bool,
    ) -> ImgProcResult<Self> {
        let size = required_len(width, height, channels)?;
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| ImgProcError::AllocationFailed { bytes: size })?;
        let fill = if zeroed { 0 } else { UNZEROED_FILL };
        data.resize(size, fill);
        Ok(Self {
            width,
            height,
            channels,
            storage: Storage::Owned(data),
        })
    }

    /// Wraps an existing interleaved byte vector.
    pub fn from_raw(
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> ImgProcResult<Self> {
        let needed = required_len(width, height, channels)?;
        if data.len() != needed {
            return Err(ImgProcError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            storage: Storage::Owned(data),
        })
    }

    /// Decodes `path` with `codec`, keeping the channel count of the file.
    pub fn load<C: ImageCodec + ?Sized, P: AsRef<Path>>(codec: &C, path: P) -> ImgProcResult<Self> {
        let DecodedImage {
            data,
            width,
            height,
            channels,
        } = codec.decode(path.as_ref())?;
        let needed = required_len(width, height, channels)?;
        if data.len() != needed {
            return Err(ImgProcError::BufferSizeMismatch {
                needed,
                got: data.len(),
            });
        }
        trace_event!("buffer_loaded", width = width, height = height, channels = channels);
        Ok(Self {
            width,
            height,
            channels,
            storage: Storage::Decoded(data),
        })
    }

    /// Encodes the buffer with `codec` and writes it to `path`.
    ///
    /// `.jpg`/`.jpeg` produce a quality-100 JPEG and `.png` a PNG; the
    /// extension is matched case-insensitively. Any other extension fails
    /// before anything is written.
    pub fn save<C: ImageCodec + ?Sized, P: AsRef<Path>>(
        &self,
        codec: &C,
        path: P,
    ) -> ImgProcResult<()> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path)?;
        let data = self.data()?;
        let bytes = match format {
            OutputFormat::Jpeg { quality } => {
                codec.encode_jpeg(data, self.width, self.height, self.channels, quality)?
            }
            OutputFormat::Png => codec.encode_png(
                data,
                self.width,
                self.height,
                self.channels,
                self.stride(),
            )?,
        };
        std::fs::write(path, bytes).map_err(|err| ImgProcError::ImageIo {
            reason: format!("failed to write {}: {err}", path.display()),
        })
    }

    /// Frees the storage and resets the buffer to the empty state.
    ///
    /// Calling this on an already released buffer does nothing.
    pub fn release(&mut self) {
        let kind = self.allocation();
        match std::mem::replace(&mut self.storage, Storage::Empty) {
            Storage::Empty => return,
            Storage::Owned(data) => drop(data),
            Storage::Decoded(data) => drop(data),
        }
        self.width = 0;
        self.height = 0;
        self.channels = 0;
        trace_event!("buffer_released", allocation = kind.as_str());
    }

    /// Returns the allocation tag.
    pub fn allocation(&self) -> Allocation {
        match self.storage {
            Storage::Empty => Allocation::None,
            Storage::Owned(_) => Allocation::SelfAllocated,
            Storage::Decoded(_) => Allocation::CodecAllocated,
        }
    }

    /// Returns true when the buffer holds no storage.
    pub fn is_empty(&self) -> bool {
        matches!(self.storage, Storage::Empty)
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the number of bytes between row starts.
    pub fn stride(&self) -> usize {
        self.width * self.channels
    }

    /// Returns the number of pixels, `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the interleaved bytes.
    pub fn data(&self) -> ImgProcResult<&[u8]> {
        match &self.storage {
            Storage::Empty => Err(ImgProcError::EmptyBuffer),
            Storage::Owned(data) | Storage::Decoded(data) => Ok(data),
        }
    }

    /// Returns the interleaved bytes mutably.
    pub fn data_mut(&mut self) -> ImgProcResult<&mut [u8]> {
        match &mut self.storage {
            Storage::Empty => Err(ImgProcError::EmptyBuffer),
            Storage::Owned(data) | Storage::Decoded(data) => Ok(data),
        }
    }

    /// Allocates a zeroed buffer with the same shape as `self`.
    pub(crate) fn create_like(&self) -> ImgProcResult<Self> {
        Self::create(self.width, self.height, self.channels, true)
    }

    /// Fails unless the buffer is allocated with at least three channels.
    pub(crate) fn require_rgb(&self) -> ImgProcResult<()> {
        if self.is_empty() {
            return Err(ImgProcError::EmptyBuffer);
        }
        if self.channels < 3 {
            return Err(ImgProcError::InsufficientChannels {
                channels: self.channels,
            });
        }
        Ok(())
    }
}

/// Copies the RGB triple of every pixel of `src` into `dst`.
///
/// Both buffers are walked with their own channel count, so an RGBA source
/// can be copied into an RGB destination and vice versa. Channels past the
/// third are left untouched.
pub fn copy_rgb_into(src: &PixelBuffer, dst: &mut PixelBuffer) -> ImgProcResult<()> {
    src.require_rgb()?;
    dst.require_rgb()?;
    if src.width != dst.width || src.height != dst.height {
        return Err(ImgProcError::BufferSizeMismatch {
            needed: src.pixel_count() * dst.channels,
            got: dst.data()?.len(),
        });
    }
    let src_channels = src.channels;
    let dst_channels = dst.channels;
    let src_data = src.data()?;
    let dst_data = dst.data_mut()?;
    for (s, d) in src_data
        .chunks_exact(src_channels)
        .zip(dst_data.chunks_exact_mut(dst_channels))
    {
        d[..3].copy_from_slice(&s[..3]);
    }
    Ok(())
}

/// Copies channels past RGB (typically alpha) from `src` into `dst`.
pub(crate) fn carry_extra_channels(src: &PixelBuffer, dst: &mut PixelBuffer) -> ImgProcResult<()> {
    let channels = src.channels;
    if channels <= 3 || dst.channels != channels {
        return Ok(());
    }
    let src_data = src.data()?;
    let dst_data = dst.data_mut()?;
    for (s, d) in src_data
        .chunks_exact(channels)
        .zip(dst_data.chunks_exact_mut(channels))
    {
        d[3..].copy_from_slice(&s[3..]);
    }
    Ok(())
}

fn required_len(width: usize, height: usize, channels: usize) -> ImgProcResult<usize> {
    let invalid = ImgProcError::InvalidDimensions {
        width,
        height,
        channels,
    };
    if width == 0 || height == 0 || channels == 0 {
        return Err(invalid);
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or(invalid)
}
