//! Rayon-parallel variants of the correlation scan and both transforms.
//!
//! Each output cell is computed independently and collected in row-major
//! order, so results are identical to the sequential functions.

use crate::grid::{Grid, ScoreGrid, ScorePoint, SpectralGrid};
use crate::image::pixel::luminance_plane;
use crate::image::PixelBuffer;
use crate::search::scan::{score_at, TemplateStats};
use crate::spectral::dft::{forward_bin, inverse_sample, Twiddles};
use crate::util::ImgProcResult;
use rayon::prelude::*;

/// Parallel [`correlation_scores`](crate::search::correlation_scores).
pub fn correlation_scores_par(
    source: &PixelBuffer,
    template: &PixelBuffer,
) -> ImgProcResult<ScoreGrid> {
    source.require_rgb()?;
    template.require_rgb()?;
    let src = luminance_plane(source)?;
    let tpl = TemplateStats::new(template)?;
    let width = src.width();
    let points: Vec<ScorePoint> = (0..src.as_slice().len())
        .into_par_iter()
        .map(|i| {
            let (bias_h, bias_v) = (i % width, i / width);
            ScorePoint {
                grid_x: bias_h,
                grid_y: bias_v,
                value: score_at(&src, &tpl, bias_v, bias_h),
            }
        })
        .collect();
    Grid::from_vec(points, width, src.height())
}

/// Parallel [`forward_dft`](crate::spectral::forward_dft).
pub fn forward_dft_par(spatial: &Grid<f64>) -> ImgProcResult<SpectralGrid> {
    let (width, height) = (spatial.width(), spatial.height());
    let twiddles = Twiddles::new(width, height, -1.0);
    let bins = (0..width * height)
        .into_par_iter()
        .map(|i| forward_bin(spatial, &twiddles, i / width, i % width))
        .collect();
    Grid::from_vec(bins, width, height)
}

/// Parallel [`inverse_dft`](crate::spectral::inverse_dft).
pub fn inverse_dft_par(spectrum: &SpectralGrid) -> ImgProcResult<Grid<f64>> {
    let (width, height) = (spectrum.width(), spectrum.height());
    let twiddles = Twiddles::new(width, height, 1.0);
    let samples = (0..width * height)
        .into_par_iter()
        .map(|i| inverse_sample(spectrum, &twiddles, i / width, i % width))
        .collect();
    Grid::from_vec(samples, width, height)
}
