use crate::coverage::CoverageTracker;
use crate::expand;
use crate::grid::PixelGrid;
use crate::model::{DEBUG_PINK, Document, FilledRect, PixelBox};
use crate::scan;
use tracing::trace;

/// Single-image covering state: the pixel snapshot, the coverage flags and the
/// rectangles emitted so far.
///
/// A converter is owned by one conversion; run several in parallel by giving
/// each its own instance.
pub struct Converter {
    grid: PixelGrid,
    coverage: CoverageTracker,
    doc: Document,
}

impl Converter {
    /// `quantized` selects the short `#rgb` fill form for the finished document.
    pub fn new(grid: PixelGrid, quantized: bool) -> Self {
        let (w, h) = (grid.width(), grid.height());
        Self {
            coverage: CoverageTracker::new(w, h),
            doc: Document::new(w, h, quantized),
            grid,
        }
    }

    pub fn coverage(&self) -> &CoverageTracker {
        &self.coverage
    }

    /// Rectangles emitted so far, in discovery order.
    pub fn rects(&self) -> &[FilledRect] {
        &self.doc.rects
    }

    pub fn first_uncovered(&self, hint_x: u32, hint_y: u32) -> Option<(u32, u32)> {
        scan::first_uncovered(&self.grid, &self.coverage, hint_x, hint_y)
    }

    pub fn done(&self, hint_x: u32, hint_y: u32) -> bool {
        scan::done(&self.grid, &self.coverage, hint_x, hint_y)
    }

    pub fn create_box(&self, x: u32, y: u32) -> PixelBox {
        expand::create_box(&self.grid, x, y)
    }

    pub fn expand(&self, bx: &mut PixelBox) -> bool {
        expand::expand(&self.grid, &self.coverage, bx)
    }

    /// Marks the box covered and appends its rectangle.
    ///
    /// `force_pink` replaces the color of boxes larger than 1x1 with
    /// [`DEBUG_PINK`]. A box whose origin is transparent is covered but not drawn.
    pub fn cover_box(&mut self, bx: PixelBox, force_pink: bool, quantize: bool) {
        self.coverage.mark_covered(bx.x0, bx.y0, bx.x1, bx.y1);
        if bx.alpha == 0 {
            return;
        }
        let mut color = if quantize { bx.color.quantize() } else { bx.color };
        if force_pink && bx.area() > 1 {
            color = DEBUG_PINK;
        }
        trace!(x = bx.x0, y = bx.y0, w = bx.width(), h = bx.height(), %color, "cover");
        self.doc.rects.push(FilledRect {
            rect: bx.rect(),
            color,
        });
    }

    /// Emits a 1x1 rectangle for every remaining uncovered opaque pixel.
    pub fn cover_all_pixels(&mut self, quantize: bool) {
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                if self.grid.pixel(x, y).is_opaque() && !self.coverage.is_covered(x, y) {
                    let bx = self.create_box(x, y);
                    self.cover_box(bx, false, quantize);
                }
            }
        }
    }

    /// Greedy loop: scan, create, expand right-then-down, cover, until done.
    ///
    /// `on_row(y, height)` is called once each time the scan reaches a new row.
    pub fn cover_greedy<F: FnMut(u32, u32)>(&mut self, pink: bool, quantize: bool, mut on_row: F) {
        let height = self.grid.height();
        let mut hint = (0, 0);
        let mut last_row = None;
        while let Some((x, y)) = self.first_uncovered(hint.0, hint.1) {
            if last_row != Some(y) {
                on_row(y, height);
                last_row = Some(y);
            }
            let mut bx = self.create_box(x, y);
            let expanded = self.expand(&mut bx);
            self.cover_box(bx, expanded && pink, quantize);
            hint = (x, y);
        }
    }

    /// Consumes the converter and returns the finished document.
    pub fn finish(self) -> Document {
        self.doc
    }
}
