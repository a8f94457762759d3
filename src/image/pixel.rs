//! Per-pixel luminance and RGB access.
//!
//! Pixels are addressed at byte offset `y * width * channels + x * channels`
//! and the first three channels are read as R, G, B. Coordinates are
//! rejected only when `x > width` or `y > height`; `x == width` therefore
//! aliases the first pixel of the next row. Coordinates that pass that check
//! but whose triple would leave the buffer are rejected as well.

use crate::grid::Grid;
use crate::image::PixelBuffer;
use crate::util::{ImgProcError, ImgProcResult};

/// Red weight of the luminance sum.
pub const LUMA_R: f64 = 0.299;
/// Green weight of the luminance sum.
pub const LUMA_G: f64 = 0.587;
/// Blue weight of the luminance sum. Not the BT.601 0.114.
pub const LUMA_B: f64 = 0.144;

/// Returns `trunc(0.299 R + 0.587 G + 0.144 B)` for pixel `(x, y)`.
///
/// The weights sum to 1.03, so a white pixel yields 262.
pub fn luminance(buf: &PixelBuffer, x: usize, y: usize) -> ImgProcResult<i32> {
    let [r, g, b] = rgb(buf, x, y)?;
    Ok(luminance_of(r, g, b))
}

/// Returns the R, G, B bytes of pixel `(x, y)`.
pub fn rgb(buf: &PixelBuffer, x: usize, y: usize) -> ImgProcResult<[u8; 3]> {
    let offset = pixel_offset(buf, x, y)?;
    let data = buf.data()?;
    Ok([data[offset], data[offset + 1], data[offset + 2]])
}

/// Writes `trunc(value)` into the R, G and B channels of pixel `(x, y)`.
pub fn set_luminance(buf: &mut PixelBuffer, x: usize, y: usize, value: f64) -> ImgProcResult<()> {
    set_rgb(buf, x, y, value, value, value)
}

/// Writes `trunc(r)`, `trunc(g)`, `trunc(b)` into pixel `(x, y)`.
///
/// The truncated value is stored modulo 256, so 300 becomes 44 and -4
/// becomes 252. NaN is stored as 0.
pub fn set_rgb(
    buf: &mut PixelBuffer,
    x: usize,
    y: usize,
    r: f64,
    g: f64,
    b: f64,
) -> ImgProcResult<()> {
    let offset = pixel_offset(buf, x, y)?;
    let data = buf.data_mut()?;
    data[offset] = wrap_to_byte(r);
    data[offset + 1] = wrap_to_byte(g);
    data[offset + 2] = wrap_to_byte(b);
    Ok(())
}

/// Truncates toward zero and keeps the low eight bits.
#[inline]
fn wrap_to_byte(value: f64) -> u8 {
    (value as i64) as u8
}

/// Returns the luminance of every pixel as a `width x height` grid.
pub fn luminance_plane(buf: &PixelBuffer) -> ImgProcResult<Grid<i32>> {
    buf.require_rgb()?;
    let channels = buf.channels();
    let data = buf.data()?;
    let values = data
        .chunks_exact(channels)
        .map(|px| luminance_of(px[0], px[1], px[2]))
        .collect();
    Grid::from_vec(values, buf.width(), buf.height())
}

#[inline]
pub(crate) fn luminance_of(r: u8, g: u8, b: u8) -> i32 {
    (LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64) as i32
}

fn pixel_offset(buf: &PixelBuffer, x: usize, y: usize) -> ImgProcResult<usize> {
    buf.require_rgb()?;
    let (width, height) = (buf.width(), buf.height());
    let out_of_bounds = ImgProcError::PixelOutOfBounds {
        x,
        y,
        width,
        height,
    };
    if x > width || y > height {
        return Err(out_of_bounds);
    }
    let offset = y
        .checked_mul(buf.stride())
        .and_then(|v| v.checked_add(x * buf.channels()))
        .ok_or_else(|| out_of_bounds.clone())?;
    if offset + 3 > buf.data()?.len() {
        return Err(out_of_bounds);
    }
    Ok(offset)
}
