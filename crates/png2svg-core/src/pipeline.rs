use crate::config::ConvertOptions;
use crate::converter::Converter;
use crate::error::Result;
use crate::grid::{PixelGrid, PixelSource};
use crate::model::Document;
use image::DynamicImage;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// In-memory image to convert (key + decoded image).
pub struct InputImage {
    pub key: String,
    pub image: DynamicImage,
}

/// Outcome of one image in a batch.
pub struct BatchItem {
    pub key: String,
    pub result: Result<Document>,
}

#[instrument(skip_all)]
/// Converts `source` into a rectangle document.
pub fn convert<S: PixelSource + ?Sized>(source: &S, opts: &ConvertOptions) -> Result<Document> {
    convert_with_progress(source, opts, |_, _| {})
}

#[instrument(skip_all)]
/// Like [`convert`], calling `on_row(y, height)` as the greedy scan reaches each new row.
///
/// Notes:
/// - Options are validated first; pink together with single-pixel mode is an error.
/// - Single-pixel mode never reports progress.
pub fn convert_with_progress<S, F>(source: &S, opts: &ConvertOptions, on_row: F) -> Result<Document>
where
    S: PixelSource + ?Sized,
    F: FnMut(u32, u32),
{
    opts.validate()?;
    let grid = PixelGrid::from_source(source)?;
    Ok(convert_grid(grid, opts, on_row))
}

/// Runs the covering pass over an already captured grid.
pub fn convert_grid<F: FnMut(u32, u32)>(grid: PixelGrid, opts: &ConvertOptions, on_row: F) -> Document {
    debug!(
        width = grid.width(),
        height = grid.height(),
        single_pixel = opts.single_pixel_mode,
        quantize = opts.quantize_colors,
        "converting"
    );
    let mut conv = Converter::new(grid, opts.quantize_colors);
    if opts.single_pixel_mode {
        conv.cover_all_pixels(opts.quantize_colors);
    } else {
        conv.cover_greedy(opts.pink_debug_color, opts.quantize_colors, on_row);
    }
    let doc = conv.finish();
    debug!(rects = doc.rects.len(), "conversion finished");
    doc
}

#[instrument(skip_all)]
/// Converts every input independently; output order matches input order.
///
/// With the `parallel` feature, images are converted on the rayon pool.
pub fn convert_batch(inputs: Vec<InputImage>, opts: &ConvertOptions) -> Vec<BatchItem> {
    let run = |inp: InputImage| BatchItem {
        result: convert(&inp.image, opts),
        key: inp.key,
    };

    #[cfg(feature = "parallel")]
    {
        inputs.into_par_iter().map(run).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        inputs.into_iter().map(run).collect()
    }
}
