//! Direct 2D discrete Fourier transform.
//!
//! Spatial grids are `width x height` with cell `(col, row)`. In the
//! transform sums `x`/`u` run over rows and `y`/`v` over columns:
//!
//! `F(u, v) = 1/(H W) Σ_x Σ_y f(x, y) e^{-2πi (u x / H + v y / W)}`
//!
//! and the inverse keeps only the real part of the unnormalized sum with
//! the opposite sign. Every bin is an explicit O(W H) sum; the exponentials
//! are read from per-axis root-of-unity tables.

use crate::grid::{Grid, SpectralCoefficient, SpectralGrid};
use crate::image::pixel::luminance_plane;
use crate::image::PixelBuffer;
use crate::util::math::{checkerboard_sign, unit_root, Complex};
use crate::util::ImgProcResult;

/// Per-axis roots of unity for one transform direction.
pub(crate) struct Twiddles {
    rows: Vec<Complex>,
    cols: Vec<Complex>,
}

impl Twiddles {
    /// `sign` is -1 for the forward and +1 for the inverse transform.
    pub(crate) fn new(width: usize, height: usize, sign: f64) -> Self {
        Self {
            rows: (0..height).map(|k| unit_root(k, height, sign)).collect(),
            cols: (0..width).map(|k| unit_root(k, width, sign)).collect(),
        }
    }

    /// Returns `e^{sign 2πi (u x / H + v y / W)}`.
    #[inline]
    fn at(&self, u: usize, x: usize, v: usize, y: usize) -> Complex {
        let h = self.rows.len();
        let w = self.cols.len();
        self.rows[(u * x) % h] * self.cols[(v * y) % w]
    }
}

/// Builds `f(x, y) = (-1)^(x + y) * luminance` over the image.
///
/// Multiplying by the checkerboard moves the zero frequency to the center
/// of the spectrum.
pub fn modulated_luminance(source: &PixelBuffer) -> ImgProcResult<Grid<f64>> {
    let plane = luminance_plane(source)?;
    let width = plane.width();
    let values = plane
        .iter()
        .enumerate()
        .map(|(i, &lum)| checkerboard_sign(i / width, i % width) * lum as f64)
        .collect();
    Grid::from_vec(values, width, plane.height())
}

/// Multiplies every sample by `(-1)^(x + y)`, undoing the modulation.
pub fn demodulate(grid: &mut Grid<f64>) {
    let width = grid.width();
    for (i, value) in grid.as_mut_slice().iter_mut().enumerate() {
        *value *= checkerboard_sign(i / width, i % width);
    }
}

/// Forward transform normalized by `1 / (W H)`.
pub fn forward_dft(spatial: &Grid<f64>) -> ImgProcResult<SpectralGrid> {
    let (width, height) = (spatial.width(), spatial.height());
    let twiddles = Twiddles::new(width, height, -1.0);
    Grid::from_fn(width, height, |v, u| Ok(forward_bin(spatial, &twiddles, u, v)))
}

/// Inverse transform; returns the real part of each sample.
pub fn inverse_dft(spectrum: &SpectralGrid) -> ImgProcResult<Grid<f64>> {
    let (width, height) = (spectrum.width(), spectrum.height());
    let twiddles = Twiddles::new(width, height, 1.0);
    Grid::from_fn(width, height, |y, x| {
        Ok(inverse_sample(spectrum, &twiddles, x, y))
    })
}

pub(crate) fn forward_bin(
    spatial: &Grid<f64>,
    twiddles: &Twiddles,
    u: usize,
    v: usize,
) -> SpectralCoefficient {
    let (width, height) = (spatial.width(), spatial.height());
    let samples = spatial.as_slice();
    let mut sum = Complex::ZERO;
    for x in 0..height {
        for y in 0..width {
            sum += twiddles.at(u, x, v, y) * samples[x * width + y];
        }
    }
    SpectralCoefficient {
        grid_x: v,
        grid_y: u,
        value: sum * (1.0 / (width * height) as f64),
    }
}

pub(crate) fn inverse_sample(
    spectrum: &SpectralGrid,
    twiddles: &Twiddles,
    x: usize,
    y: usize,
) -> f64 {
    let (width, height) = (spectrum.width(), spectrum.height());
    let bins = spectrum.as_slice();
    let mut sum = Complex::ZERO;
    for u in 0..height {
        for v in 0..width {
            sum += bins[u * width + v].value * twiddles.at(u, x, v, y);
        }
    }
    sum.re
}

/// Attenuation `exp(-((u - H/2)² + (v - W/2)²) / (2 variance))` of bin `(u, v)`.
pub fn gaussian_weight(u: usize, v: usize, width: usize, height: usize, variance: f64) -> f64 {
    let du = u as f64 - height as f64 / 2.0;
    let dv = v as f64 - width as f64 / 2.0;
    (-(du * du + dv * dv) / (2.0 * variance)).exp()
}

/// Multiplies every coefficient by its centered Gaussian weight.
pub fn apply_gaussian_mask(spectrum: &mut SpectralGrid, variance: f64) {
    let (width, height) = (spectrum.width(), spectrum.height());
    for bin in spectrum.as_mut_slice() {
        bin.value = bin.value * gaussian_weight(bin.grid_y, bin.grid_x, width, height, variance);
    }
}
