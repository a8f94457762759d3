//! Low-level building blocks behind the three top-level operations.
//!
//! These expose the pixel accessors, the windowed kernel sum, the raw score
//! grids and the individual transform stages. Most users should prefer
//! [`edge_detect`](crate::edge_detect), [`detect_object`](crate::detect_object)
//! and [`gaussian_low_pass`](crate::gaussian_low_pass).

pub use crate::edge::edge_scores;
pub use crate::image::copy_rgb_into;
pub use crate::image::pixel::{luminance, luminance_plane, rgb, set_luminance, set_rgb};
pub use crate::kernel::{windowed_kernel_sum, Kernel3, SOBEL_X, SOBEL_Y};
pub use crate::search::{average_luminance, correlation_scores, mark_matches};
pub use crate::spectral::{
    apply_gaussian_mask, demodulate, forward_dft, gaussian_weight, inverse_dft,
    modulated_luminance,
};

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::{correlation_scores_par, forward_dft_par, inverse_dft_par};
