//! Normalized cross-correlation scores over every anchor of the source.
//!
//! Windows are template-sized and anchored at their top-left corner. Anchors
//! span the whole source, so windows near the right and bottom edges read
//! zero-padded samples. Window means are truncated to integers and always
//! divide by the full template area.

use crate::grid::{Grid, ScoreGrid, ScorePoint};
use crate::image::pixel::{luminance, luminance_plane};
use crate::image::PixelBuffer;
use crate::util::ImgProcResult;

/// Mean luminance of the template-sized window of `source` anchored at
/// `(bias_h, bias_v)`, truncated toward zero.
///
/// Out-of-bounds samples count as 0 and the divisor is always the template
/// pixel count, even when the window is clipped.
pub fn average_luminance(
    source: &PixelBuffer,
    template: &PixelBuffer,
    bias_v: usize,
    bias_h: usize,
) -> ImgProcResult<i32> {
    let (tw, th) = (template.width(), template.height());
    let mut sum = 0.0f64;
    for y in bias_v..bias_v + th {
        for x in bias_h..bias_h + tw {
            if y < source.height() && x < source.width() {
                sum += luminance(source, x, y)? as f64;
            }
        }
    }
    Ok((sum / (tw * th) as f64) as i32)
}

/// Luminance statistics of a template, computed once per search.
pub(crate) struct TemplateStats {
    lum: Grid<i32>,
    avg: i32,
    sum_sq_dev: f64,
}

impl TemplateStats {
    pub(crate) fn new(template: &PixelBuffer) -> ImgProcResult<Self> {
        let lum = luminance_plane(template)?;
        let (tw, th) = (lum.width(), lum.height());
        let avg = window_average(&lum, tw, th, 0, 0);
        let sum_sq_dev = lum
            .iter()
            .map(|&t| {
                let dev = (t - avg) as f64;
                dev * dev
            })
            .sum();
        Ok(Self {
            lum,
            avg,
            sum_sq_dev,
        })
    }

    pub(crate) fn width(&self) -> usize {
        self.lum.width()
    }

    pub(crate) fn height(&self) -> usize {
        self.lum.height()
    }
}

/// Mean of the `tw x th` window of `plane` at `(bias_h, bias_v)`, truncated.
fn window_average(plane: &Grid<i32>, tw: usize, th: usize, bias_v: usize, bias_h: usize) -> i32 {
    let mut sum = 0.0f64;
    for y in bias_v..bias_v + th {
        for x in bias_h..bias_h + tw {
            sum += plane.get(x, y).copied().unwrap_or(0) as f64;
        }
    }
    (sum / (tw * th) as f64) as i32
}

/// Correlation score `|coef| * 255` at anchor `(bias_h, bias_v)`.
///
/// A zero denominator (flat template or flat window) yields 0.
pub(crate) fn score_at(src: &Grid<i32>, tpl: &TemplateStats, bias_v: usize, bias_h: usize) -> f64 {
    let (tw, th) = (tpl.width(), tpl.height());
    let local_avg = window_average(src, tw, th, bias_v, bias_h);
    let mut numerator = 0.0f64;
    let mut sum_sq_window = 0.0f64;
    for ty in 0..th {
        for tx in 0..tw {
            let s = src.get(bias_h + tx, bias_v + ty).copied().unwrap_or(0);
            let part = (s - local_avg) as f64;
            sum_sq_window += part * part;
            let t = tpl.lum.as_slice()[ty * tw + tx];
            numerator += (t - tpl.avg) as f64 * part;
        }
    }
    let denominator = (tpl.sum_sq_dev * sum_sq_window).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    (numerator / denominator).abs() * 255.0
}

/// Computes the correlation score of `template` at every anchor of `source`.
///
/// The returned grid has the source dimensions; the point at `(x, y)` holds
/// the score of the window whose top-left corner is `(x, y)`.
pub fn correlation_scores(source: &PixelBuffer, template: &PixelBuffer) -> ImgProcResult<ScoreGrid> {
    source.require_rgb()?;
    template.require_rgb()?;
    let src = luminance_plane(source)?;
    let tpl = TemplateStats::new(template)?;
    scores_from_planes(&src, &tpl)
}

pub(crate) fn scores_from_planes(src: &Grid<i32>, tpl: &TemplateStats) -> ImgProcResult<ScoreGrid> {
    let (width, height) = (src.width(), src.height());
    let mut points = vec![ScorePoint::default(); width * height];
    for bias_h in 0..width {
        for bias_v in 0..height {
            points[bias_v * width + bias_h] = ScorePoint {
                grid_x: bias_h,
                grid_y: bias_v,
                value: score_at(src, tpl, bias_v, bias_h),
            };
        }
    }
    Grid::from_vec(points, width, height)
}
