//! imgproc is a small CPU image-analysis toolkit with three operations:
//! Sobel edge detection, template matching by normalized cross-correlation,
//! and a Gaussian low-pass filter computed with a direct 2D DFT.
//!
//! Images are held in [`PixelBuffer`]s. Decoding and encoding go through an
//! injected [`ImageCodec`]; the `image-io` feature provides one backed by the
//! `image` crate. The `rayon` feature enables parallel scans and transforms
//! and the `tracing` feature emits spans for every top-level operation.

pub mod edge;
pub mod grid;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod spectral;
mod trace;
pub mod util;

pub use crate::image::codec::{DecodedImage, ImageCodec, OutputFormat, JPEG_QUALITY};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{Allocation, PixelBuffer};
pub use edge::edge_detect;
pub use grid::{Grid, ScoreGrid, ScorePoint, SpectralCoefficient, SpectralGrid};
pub use search::{detect_object, detect_object_with, precision_threshold, DetectConfig};
pub use spectral::{gaussian_low_pass, gaussian_low_pass_with, SpectralConfig};
pub use util::math::Complex;
pub use util::{ImgProcError, ImgProcResult};
