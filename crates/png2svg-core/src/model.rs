use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hot pink used to highlight merged rectangles when debugging.
pub const DEBUG_PINK: Color = Color::new(0xff, 0x69, 0xb4);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Keeps the high nibble of every channel (one of 4096 colors).
    pub const fn quantize(self) -> Self {
        Self {
            r: self.r & 0xf0,
            g: self.g & 0xf0,
            b: self.b & 0xf0,
        }
    }

    /// True if the low nibble of every channel is zero.
    pub fn is_quantized(&self) -> bool {
        self.quantize() == *self
    }

    /// `#rrggbb`, lowercase.
    pub fn hex6(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `#rgb` built from the high nibbles.
    pub fn hex3(&self) -> String {
        format!("#{:x}{:x}{:x}", self.r >> 4, self.g >> 4, self.b >> 4)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex6())
    }
}

/// A single source pixel: color plus 8-bit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub color: Color,
    pub alpha: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel {
        color: Color::new(0, 0, 0),
        alpha: 0,
    };

    pub const fn new(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self {
            color: Color::new(r, g, b),
            alpha,
        }
    }

    /// Any non-zero alpha counts as opaque for covering purposes.
    #[inline]
    pub fn is_opaque(&self) -> bool {
        self.alpha != 0
    }
}

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// True if the pixel `(x, y)` lies inside the rectangle.
    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && y >= self.y && x <= self.right() && y <= self.bottom()
    }
    /// True if the two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x + self.w <= other.x
            || other.x + other.w <= self.x
            || self.y + self.h <= other.y
            || other.y + other.h <= self.y)
    }
}

/// Candidate rectangle grown by the expander. Corners are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
    pub color: Color,
    /// Alpha of the originating pixel.
    pub alpha: u8,
}

impl PixelBox {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }
    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }
    pub fn area(&self) -> u64 {
        (self.width() as u64) * (self.height() as u64)
    }
    pub fn rect(&self) -> Rect {
        Rect::new(self.x0, self.y0, self.width(), self.height())
    }
}

/// A finalized, solid-color rectangle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilledRect {
    pub rect: Rect,
    pub color: Color,
}

/// Result of a conversion: canvas size plus rectangles in draw order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub width: u32,
    pub height: u32,
    /// Colors were reduced to 4096 entries; fills serialize as `#rgb`.
    pub quantized: bool,
    pub rects: Vec<FilledRect>,
}

impl Document {
    pub fn new(width: u32, height: u32, quantized: bool) -> Self {
        Self {
            width,
            height,
            quantized,
            rects: Vec::new(),
        }
    }

    /// Fill value used by the serializers for `color`.
    pub fn fill(&self, color: &Color) -> String {
        if self.quantized {
            color.hex3()
        } else {
            color.hex6()
        }
    }

    /// Computes conversion statistics for this document.
    pub fn stats(&self) -> ConvertStats {
        let mut covered_pixels = 0u64;
        let mut merged_rects = 0;
        let mut largest_rect_area = 0u64;
        let mut colors = HashSet::new();

        for fr in &self.rects {
            let area = fr.rect.area();
            covered_pixels += area;
            largest_rect_area = largest_rect_area.max(area);
            if area > 1 {
                merged_rects += 1;
            }
            colors.insert(fr.color);
        }

        let num_rects = self.rects.len();
        let pixels_per_rect = if num_rects > 0 {
            covered_pixels as f64 / num_rects as f64
        } else {
            0.0
        };

        ConvertStats {
            width: self.width,
            height: self.height,
            num_rects,
            covered_pixels,
            merged_rects,
            largest_rect_area,
            distinct_colors: colors.len(),
            pixels_per_rect,
        }
    }
}

/// Statistics about a finished conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConvertStats {
    pub width: u32,
    pub height: u32,
    /// Number of emitted rectangles.
    pub num_rects: usize,
    /// Pixels drawn by the rectangles (equals the opaque pixel count).
    pub covered_pixels: u64,
    /// Rectangles spanning more than one pixel.
    pub merged_rects: usize,
    pub largest_rect_area: u64,
    pub distinct_colors: usize,
    /// Average rectangle area. Higher means better merging.
    pub pixels_per_rect: f64,
}

impl ConvertStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Rects: {}, Pixels: {}, Merged: {}, Largest: {} px², Colors: {}, Px/Rect: {:.2}",
            self.width,
            self.height,
            self.num_rects,
            self.covered_pixels,
            self.merged_rects,
            self.largest_rect_area,
            self.distinct_colors,
            self.pixels_per_rect,
        )
    }

    /// Transparent pixels on the canvas (not drawn).
    pub fn transparent_pixels(&self) -> u64 {
        ((self.width as u64) * (self.height as u64)).saturating_sub(self.covered_pixels)
    }
}
