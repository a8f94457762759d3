//! Template matching by normalized cross-correlation ("object detection").
//!
//! Scores are computed for every anchor of the source, thresholded by a
//! precision level in `[0, 10]`, and every hit is outlined in red on a copy
//! of the source.

use crate::grid::ScoreGrid;
use crate::image::{carry_extra_channels, copy_rgb_into, PixelBuffer};
use crate::trace::{trace_event, trace_span};
use crate::util::{ImgProcError, ImgProcResult};

pub mod rect;
pub mod scan;

pub use rect::mark_matches;
pub use scan::{average_luminance, correlation_scores};

/// Highest accepted precision level.
pub const MAX_PRECISION: i32 = 10;

/// Band thickness of the drawn rectangles.
pub const DEFAULT_THICKNESS: usize = 3;

/// Configuration for [`detect_object_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectConfig {
    /// Precision level in `[0, 10]`; see [`precision_threshold`].
    pub precision: i32,
    /// Band thickness of the drawn rectangles.
    pub thickness: usize,
    /// Scan anchors on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            precision: MAX_PRECISION,
            thickness: DEFAULT_THICKNESS,
            parallel: false,
        }
    }
}

/// Maps a precision level to the score threshold `round(15.5 p) + 100`.
///
/// Level 0 gives 100 and level 10 gives 255.
pub fn precision_threshold(precision: i32) -> ImgProcResult<i32> {
    if !(0..=MAX_PRECISION).contains(&precision) {
        return Err(ImgProcError::PrecisionOutOfRange { precision });
    }
    Ok((15.5 * precision as f64).round() as i32 + 100)
}

/// Outlines every position of `source` where `template` correlates at the
/// given precision level.
pub fn detect_object(
    source: &PixelBuffer,
    template: &PixelBuffer,
    precision: i32,
) -> ImgProcResult<PixelBuffer> {
    detect_object_with(
        source,
        template,
        &DetectConfig {
            precision,
            ..DetectConfig::default()
        },
    )
}

/// [`detect_object`] with explicit configuration.
pub fn detect_object_with(
    source: &PixelBuffer,
    template: &PixelBuffer,
    cfg: &DetectConfig,
) -> ImgProcResult<PixelBuffer> {
    let _guard = trace_span!(
        "detect_object",
        width = source.width(),
        height = source.height(),
        template_width = template.width(),
        template_height = template.height()
    )
    .entered();
    source.require_rgb()?;
    template.require_rgb()?;
    let threshold = precision_threshold(cfg.precision)?;

    let scores = compute_scores(source, template, cfg.parallel)?;

    let mut dest = source.create_like()?;
    copy_rgb_into(source, &mut dest)?;
    carry_extra_channels(source, &mut dest)?;
    let marked = mark_matches(
        &mut dest,
        template.width(),
        template.height(),
        &scores,
        threshold,
        cfg.thickness,
    )?;
    trace_event!("matches_marked", threshold = threshold, marked = marked);
    Ok(dest)
}

fn compute_scores(
    source: &PixelBuffer,
    template: &PixelBuffer,
    parallel: bool,
) -> ImgProcResult<ScoreGrid> {
    #[cfg(feature = "rayon")]
    {
        if parallel {
            return crate::kernel::rayon::correlation_scores_par(source, template);
        }
    }
    let _ = parallel;
    correlation_scores(source, template)
}

#[cfg(test)]
mod tests {
    use super::{precision_threshold, DetectConfig};
    use crate::util::ImgProcError;

    #[test]
    fn thresholds_follow_rounded_formula() {
        let expected = [100, 116, 131, 147, 162, 178, 193, 209, 224, 240, 255];
        for (p, want) in expected.iter().enumerate() {
            assert_eq!(precision_threshold(p as i32).unwrap(), *want);
        }
    }

    #[test]
    fn out_of_range_precision_is_rejected() {
        for p in [-1, 11] {
            assert_eq!(
                precision_threshold(p).unwrap_err(),
                ImgProcError::PrecisionOutOfRange { precision: p }
            );
        }
    }

    #[test]
    fn default_config_is_strict() {
        let cfg = DetectConfig::default();
        assert_eq!(cfg.precision, 10);
        assert_eq!(cfg.thickness, 3);
        assert!(!cfg.parallel);
    }
}
