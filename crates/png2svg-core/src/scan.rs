use crate::coverage::CoverageTracker;
use crate::grid::PixelGrid;

/// Finds the next uncovered, opaque pixel in row-major order.
///
/// The scan starts at the hint, runs to the end of the grid, then wraps to
/// `(0, 0)` and stops just before the hint, so every pixel is examined once.
/// A hint outside the grid starts the scan at `(0, 0)`.
pub fn first_uncovered(
    grid: &PixelGrid,
    coverage: &CoverageTracker,
    hint_x: u32,
    hint_y: u32,
) -> Option<(u32, u32)> {
    let (w, h) = (grid.width(), grid.height());
    if w == 0 || h == 0 {
        return None;
    }
    let total = w as u64 * h as u64;
    let start = if hint_x < w && hint_y < h {
        hint_y as u64 * w as u64 + hint_x as u64
    } else {
        0
    };
    (0..total)
        .map(|i| (start + i) % total)
        .map(|i| ((i % w as u64) as u32, (i / w as u64) as u32))
        .find(|&(x, y)| grid.pixel(x, y).is_opaque() && !coverage.is_covered(x, y))
}

/// True when no uncovered opaque pixel remains anywhere in the grid.
pub fn done(grid: &PixelGrid, coverage: &CoverageTracker, hint_x: u32, hint_y: u32) -> bool {
    first_uncovered(grid, coverage, hint_x, hint_y).is_none()
}
