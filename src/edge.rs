//! Sobel edge detection.
//!
//! For each anchor `(x, y)` the Sobel responses are taken over the 3x3
//! window whose top-left corner is `(x, y)`, and the gradient magnitude is
//! written as a gray value at the same pixel. The window is not centered,
//! so the last two columns and rows always see zero padding.

use crate::grid::{Grid, ScoreGrid, ScorePoint};
use crate::image::pixel::set_luminance;
use crate::image::{carry_extra_channels, PixelBuffer};
use crate::kernel::{windowed_kernel_sum, SOBEL_X, SOBEL_Y};
use crate::trace::{trace_event, trace_span};
use crate::util::ImgProcResult;

/// Computes the unclamped Sobel magnitude for every anchor of `source`.
///
/// The scan runs over columns in the outer loop and rows in the inner loop.
pub fn edge_scores(source: &PixelBuffer) -> ImgProcResult<ScoreGrid> {
    source.require_rgb()?;
    let (width, height) = (source.width(), source.height());
    let mut points = vec![ScorePoint::default(); width * height];
    for bias_h in 0..width {
        for bias_v in 0..height {
            let gx = windowed_kernel_sum(&SOBEL_X, source, bias_v, bias_h)?;
            let gy = windowed_kernel_sum(&SOBEL_Y, source, bias_v, bias_h)?;
            points[bias_v * width + bias_h] = ScorePoint {
                grid_x: bias_h,
                grid_y: bias_v,
                value: (gx * gx + gy * gy).sqrt(),
            };
        }
    }
    Grid::from_vec(points, width, height)
}

/// Returns a gray edge-magnitude image with the shape of `source`.
///
/// Requires an allocated source with at least three channels. Each
/// magnitude is truncated and stored modulo 256.
pub fn edge_detect(source: &PixelBuffer) -> ImgProcResult<PixelBuffer> {
    let _guard = trace_span!(
        "edge_detect",
        width = source.width(),
        height = source.height()
    )
    .entered();
    source.require_rgb()?;
    let scores = edge_scores(source)?;
    let mut dest = source.create_like()?;
    carry_extra_channels(source, &mut dest)?;
    for point in scores.iter() {
        set_luminance(&mut dest, point.grid_x, point.grid_y, point.value)?;
    }
    let max_magnitude = scores.iter().map(|p| p.value).fold(0.0f64, f64::max);
    trace_event!("edge_magnitude", max = max_magnitude);
    Ok(dest)
}
