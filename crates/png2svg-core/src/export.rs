use crate::error::{Png2SvgError, Result};
use crate::model::{ConvertStats, Document};
use crate::svg::write_scoped;
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use tracing::instrument;

/// Serialize the document as `{ width, height, quantized, rects: [{x, y, w, h, fill}] }`.
/// Rectangles keep draw order; `fill` uses the same hex form as the SVG output.
pub fn to_json_rects(doc: &Document) -> Value {
    let rects: Vec<Value> = doc
        .rects
        .iter()
        .map(|fr| {
            json!({
                "x": fr.rect.x,
                "y": fr.rect.y,
                "w": fr.rect.w,
                "h": fr.rect.h,
                "fill": doc.fill(&fr.color),
            })
        })
        .collect();
    json!({
        "width": doc.width,
        "height": doc.height,
        "quantized": doc.quantized,
        "rects": rects,
    })
}

/// Flat stats object, suitable for `--export-stats`.
pub fn stats_json(stats: &ConvertStats) -> Value {
    json!({
        "width": stats.width,
        "height": stats.height,
        "rects": stats.num_rects,
        "covered_pixels": stats.covered_pixels,
        "transparent_pixels": stats.transparent_pixels(),
        "merged_rects": stats.merged_rects,
        "largest_rect_area": stats.largest_rect_area,
        "distinct_colors": stats.distinct_colors,
        "pixels_per_rect": stats.pixels_per_rect,
    })
}

#[instrument(skip_all, fields(path = %path.display()))]
/// Writes `to_json_rects(doc)` (pretty-printed) to `path`, all-or-nothing like
/// [`write_svg`](crate::svg::write_svg).
pub fn write_json(doc: &Document, path: &Path) -> Result<()> {
    let value = to_json_rects(doc);
    write_scoped(path, |w| {
        serde_json::to_writer_pretty(&mut *w, &value).map_err(|e| Png2SvgError::Encode(e.to_string()))?;
        w.write_all(b"\n")?;
        Ok(())
    })
}
