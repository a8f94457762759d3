//! 3x3 convolution kernels and the zero-padded windowed sum.
//!
//! Kernels are stored as `[[i32; 3]; 3]` and indexed `kernel[dx][dy]`, where
//! `dx` is the column offset and `dy` the row offset inside the window. The
//! outer index is therefore the column, which transposes the literal layout
//! of the constants below; edge output depends on this convention.

use crate::image::pixel::luminance;
use crate::image::PixelBuffer;
use crate::util::ImgProcResult;

/// Fixed 3x3 integer kernel, indexed `[dx][dy]`.
pub type Kernel3 = [[i32; 3]; 3];

/// Sobel kernel for the x gradient.
pub const SOBEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

/// Sobel kernel for the y gradient.
pub const SOBEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

/// Sums `luminance * kernel[x - bias_h][y - bias_v]` over the 3x3 window
/// whose top-left corner is `(bias_h, bias_v)`.
///
/// Samples with `x >= width` or `y >= height` contribute zero.
pub fn windowed_kernel_sum(
    kernel: &Kernel3,
    buf: &PixelBuffer,
    bias_v: usize,
    bias_h: usize,
) -> ImgProcResult<f64> {
    let (width, height) = (buf.width(), buf.height());
    let mut value = 0.0;
    for y in bias_v..bias_v + 3 {
        for x in bias_h..bias_h + 3 {
            let intensity = if y < height && x < width {
                luminance(buf, x, y)?
            } else {
                0
            };
            value += (intensity * kernel[x - bias_h][y - bias_v]) as f64;
        }
    }
    Ok(value)
}

#[cfg(feature = "rayon")]
pub mod rayon;
