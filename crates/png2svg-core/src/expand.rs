use crate::coverage::CoverageTracker;
use crate::grid::PixelGrid;
use crate::model::{Color, PixelBox};

/// Creates a 1x1 box carrying the color and alpha of `(x, y)`.
pub fn create_box(grid: &PixelGrid, x: u32, y: u32) -> PixelBox {
    let px = grid.pixel(x, y);
    PixelBox {
        x0: x,
        y0: y,
        x1: x,
        y1: y,
        color: px.color,
        alpha: px.alpha,
    }
}

#[inline]
fn mergeable(grid: &PixelGrid, coverage: &CoverageTracker, x: u32, y: u32, color: Color) -> bool {
    let px = grid.pixel(x, y);
    px.is_opaque() && px.color == color && !coverage.is_covered(x, y)
}

/// Grows `bx` to the right as far as possible, then downwards.
///
/// A transparent, covered or differently colored pixel anywhere along the
/// candidate column (or row) stops growth in that direction. Returns true if
/// the box ends up larger than 1x1.
pub fn expand(grid: &PixelGrid, coverage: &CoverageTracker, bx: &mut PixelBox) -> bool {
    while bx.x1 + 1 < grid.width()
        && (bx.y0..=bx.y1).all(|y| mergeable(grid, coverage, bx.x1 + 1, y, bx.color))
    {
        bx.x1 += 1;
    }
    while bx.y1 + 1 < grid.height()
        && (bx.x0..=bx.x1).all(|x| mergeable(grid, coverage, x, bx.y1 + 1, bx.color))
    {
        bx.y1 += 1;
    }
    bx.area() > 1
}
