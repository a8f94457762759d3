//! Rectangle marking for correlation hits.

use crate::grid::ScoreGrid;
use crate::image::pixel::set_rgb;
use crate::image::PixelBuffer;
use crate::util::ImgProcResult;

/// Outline color of a marked match.
pub const MARK_COLOR: [f64; 3] = [255.0, 0.0, 0.0];

/// Draws an unfilled rectangle for every grid point scoring at least
/// `threshold` and returns how many points were marked.
///
/// For a hit at `(x, y)` with a `tw x th` template and band thickness `t`:
/// the top band covers rows `[y, y + t)` and the bottom band rows
/// `[y + th - t + 1, y + th]`, both over columns `[x, x + tw)`; the left band
/// covers columns `[x, x + t)` and the right band columns
/// `[x + tw - t + 1, x + tw]`, both over rows `[y, y + th)`. The far bands
/// reach one pixel past the template extent. Pixels outside `dest` are
/// skipped.
pub fn mark_matches(
    dest: &mut PixelBuffer,
    template_width: usize,
    template_height: usize,
    scores: &ScoreGrid,
    threshold: i32,
    thickness: usize,
) -> ImgProcResult<usize> {
    let threshold = threshold as f64;
    let mut marked = 0usize;
    for point in scores.iter() {
        if point.value < threshold {
            continue;
        }
        draw_outline(
            dest,
            point.grid_x,
            point.grid_y,
            template_width,
            template_height,
            thickness,
        )?;
        marked += 1;
    }
    Ok(marked)
}

fn draw_outline(
    dest: &mut PixelBuffer,
    x: usize,
    y: usize,
    tw: usize,
    th: usize,
    thickness: usize,
) -> ImgProcResult<()> {
    let far_row = (y + th + 1).saturating_sub(thickness);
    let far_col = (x + tw + 1).saturating_sub(thickness);
    fill_band(dest, x..x + tw, y..y + thickness)?;
    fill_band(dest, x..x + tw, far_row..y + th + 1)?;
    fill_band(dest, x..x + thickness, y..y + th)?;
    fill_band(dest, far_col..x + tw + 1, y..y + th)?;
    Ok(())
}

fn fill_band(
    dest: &mut PixelBuffer,
    cols: std::ops::Range<usize>,
    rows: std::ops::Range<usize>,
) -> ImgProcResult<()> {
    let [r, g, b] = MARK_COLOR;
    let (width, height) = (dest.width(), dest.height());
    for col in cols.start..cols.end.min(width) {
        for row in rows.start..rows.end.min(height) {
            set_rgb(dest, col, row, r, g, b)?;
        }
    }
    Ok(())
}
