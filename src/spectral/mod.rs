//! Frequency-domain Gaussian low-pass filter ("Gauss filter").
//!
//! The luminance is checkerboard-modulated, transformed with a direct DFT,
//! attenuated by a centered Gaussian of variance [`SPECTRAL_VARIANCE`],
//! transformed back and demodulated. The filtered luminance then scales the
//! normalized RGB of each source pixel, so color survives the filter.
//!
//! Both transforms cost O((W H)²), so images above
//! [`SpectralConfig::max_pixels`] are rejected before any work is done.

use crate::grid::{Grid, SpectralGrid};
use crate::image::pixel::{rgb, set_rgb};
use crate::image::{carry_extra_channels, PixelBuffer};
use crate::trace::{trace_event, trace_span};
use crate::util::{ImgProcError, ImgProcResult};

pub mod dft;

pub use dft::{
    apply_gaussian_mask, demodulate, forward_dft, gaussian_weight, inverse_dft,
    modulated_luminance,
};

/// Variance of the spectral Gaussian.
pub const SPECTRAL_VARIANCE: f64 = 3.0;

/// Default pixel cap for the direct transform.
pub const MAX_SPECTRAL_PIXELS: usize = 20_000;

/// Configuration for [`gaussian_low_pass_with`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpectralConfig {
    /// Largest accepted `width * height`.
    pub max_pixels: usize,
    /// Compute transform bins on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            max_pixels: MAX_SPECTRAL_PIXELS,
            parallel: false,
        }
    }
}

/// Applies the Gaussian low-pass filter with the default configuration.
pub fn gaussian_low_pass(source: &PixelBuffer) -> ImgProcResult<PixelBuffer> {
    gaussian_low_pass_with(source, &SpectralConfig::default())
}

/// [`gaussian_low_pass`] with explicit configuration.
pub fn gaussian_low_pass_with(
    source: &PixelBuffer,
    cfg: &SpectralConfig,
) -> ImgProcResult<PixelBuffer> {
    let _guard = trace_span!(
        "gaussian_low_pass",
        width = source.width(),
        height = source.height(),
        parallel = cfg.parallel
    )
    .entered();
    source.require_rgb()?;
    let pixels = source.pixel_count();
    if pixels > cfg.max_pixels {
        return Err(ImgProcError::ImageTooLarge {
            pixels,
            max: cfg.max_pixels,
        });
    }

    let spatial = modulated_luminance(source)?;
    let mut spectrum = transform_forward(&spatial, cfg.parallel)?;
    apply_gaussian_mask(&mut spectrum, SPECTRAL_VARIANCE);
    let mut filtered = transform_inverse(&spectrum, cfg.parallel)?;
    demodulate(&mut filtered);
    trace_event!("spectrum_filtered", pixels = pixels);

    let mut dest = source.create_like()?;
    carry_extra_channels(source, &mut dest)?;
    for row in 0..source.height() {
        for col in 0..source.width() {
            let [r, g, b] = rgb(source, col, row)?;
            let lum = filtered.as_slice()[row * source.width() + col];
            set_rgb(
                &mut dest,
                col,
                row,
                r as f64 / 255.0 * lum,
                g as f64 / 255.0 * lum,
                b as f64 / 255.0 * lum,
            )?;
        }
    }
    Ok(dest)
}

fn transform_forward(spatial: &Grid<f64>, parallel: bool) -> ImgProcResult<SpectralGrid> {
    #[cfg(feature = "rayon")]
    {
        if parallel {
            return crate::kernel::rayon::forward_dft_par(spatial);
        }
    }
    let _ = parallel;
    forward_dft(spatial)
}

fn transform_inverse(spectrum: &SpectralGrid, parallel: bool) -> ImgProcResult<Grid<f64>> {
    #[cfg(feature = "rayon")]
    {
        if parallel {
            return crate::kernel::rayon::inverse_dft_par(spectrum);
        }
    }
    let _ = parallel;
    inverse_dft(spectrum)
}

#[cfg(test)]
mod tests {
    use super::{gaussian_low_pass, gaussian_low_pass_with, SpectralConfig};
    use crate::image::PixelBuffer;
    use crate::util::ImgProcError;

    #[test]
    fn oversized_images_are_rejected_before_work() {
        let src = PixelBuffer::create(201, 100, 3, true).unwrap();
        assert_eq!(
            gaussian_low_pass(&src).unwrap_err(),
            ImgProcError::ImageTooLarge {
                pixels: 20_100,
                max: 20_000,
            }
        );
    }

    #[test]
    fn pixel_cap_is_configurable() {
        let src = PixelBuffer::create(4, 4, 3, true).unwrap();
        let cfg = SpectralConfig {
            max_pixels: 15,
            ..SpectralConfig::default()
        };
        assert!(matches!(
            gaussian_low_pass_with(&src, &cfg),
            Err(ImgProcError::ImageTooLarge { pixels: 16, max: 15 })
        ));
    }

    #[test]
    fn black_image_stays_black() {
        let src = PixelBuffer::create(6, 5, 3, true).unwrap();
        let out = gaussian_low_pass(&src).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (6, 5, 3));
        assert!(out.data().unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn requires_three_channels() {
        let src = PixelBuffer::create(4, 4, 2, true).unwrap();
        assert_eq!(
            gaussian_low_pass(&src).unwrap_err(),
            ImgProcError::InsufficientChannels { channels: 2 }
        );
    }
}
