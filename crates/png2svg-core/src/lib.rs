//! Core library for turning pixel images into SVG rectangles.
//!
//! - Covering: every opaque pixel ends up in exactly one solid-color rectangle.
//!   Rectangles grow greedily to the right, then downwards, from the first
//!   uncovered pixel in row-major order.
//! - Modes: greedy (default) or one rectangle per pixel; optional 4096-color
//!   quantization and a pink debug fill for merged rectangles.
//! - Output: SVG (`svg`) or a JSON layout (`export`). Data model is serde-serializable.
//!
//! Quick example:
//! ```ignore
//! use png2svg_core::{ConvertOptions, convert, svg};
//! # fn main() -> anyhow::Result<()> {
//! let img = image::open("sprite.png")?;
//! let opts = ConvertOptions::builder().quantize_colors(true).build();
//! let doc = convert(&img, &opts)?;
//! svg::write_svg(&doc, "sprite.svg".as_ref())?;
//! println!("rects: {}", doc.rects.len());
//! # Ok(()) }
//! ```

pub mod config;
pub mod converter;
pub mod coverage;
pub mod error;
pub mod expand;
pub mod export;
pub mod grid;
pub mod model;
pub mod pipeline;
pub mod scan;
pub mod svg;

pub use config::*;
pub use converter::Converter;
pub use coverage::CoverageTracker;
pub use error::*;
pub use export::*;
pub use grid::{PixelGrid, PixelSource};
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `png2svg_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{ConvertOptions, ConvertOptionsBuilder};
    pub use crate::converter::Converter;
    pub use crate::coverage::CoverageTracker;
    pub use crate::grid::{PixelGrid, PixelSource};
    pub use crate::model::{Color, ConvertStats, DEBUG_PINK, Document, FilledRect, Pixel, PixelBox, Rect};
    pub use crate::export::{to_json_rects, write_json};
    pub use crate::svg::{to_svg_string, write_svg};
    pub use crate::{BatchItem, InputImage, convert, convert_batch, convert_with_progress};
}
