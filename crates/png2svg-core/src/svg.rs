use crate::error::Result;
use crate::model::Document;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Writes the SVG document to `w`: header, one `<rect>` per rectangle in
/// draw order, closing tag.
pub fn write_svg_to<W: Write>(doc: &Document, mut w: W) -> Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#)?;
    writeln!(
        w,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
        doc.width, doc.height
    )?;
    for fr in &doc.rects {
        writeln!(
            w,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            fr.rect.x,
            fr.rect.y,
            fr.rect.w,
            fr.rect.h,
            doc.fill(&fr.color)
        )?;
    }
    writeln!(w, "</svg>")?;
    w.flush()?;
    Ok(())
}

/// Renders the document into a `String`.
pub fn to_svg_string(doc: &Document) -> String {
    let mut buf = Vec::with_capacity(128 + doc.rects.len() * 64);
    // Writing into a Vec cannot fail.
    let _ = write_svg_to(doc, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[instrument(skip_all, fields(path = %path.display()))]
/// Writes the document to `path` without leaving a truncated file behind.
pub fn write_svg(doc: &Document, path: &Path) -> Result<()> {
    write_scoped(path, |w| write_svg_to(doc, w))?;
    debug!(rects = doc.rects.len(), "svg written");
    Ok(())
}

/// Runs `write` against a temporary sibling of `path` and renames it over
/// `path` once fully flushed. On failure the temporary file is removed.
pub(crate) fn write_scoped<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = temp_path(path);
    let written = write_then_rename(&tmp, path, write);
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_then_rename<F>(tmp: &Path, path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut bw = BufWriter::new(File::create(tmp)?);
    write(&mut bw)?;
    bw.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    fs::rename(tmp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".into());
    path.with_file_name(format!(".{name}.tmp"))
}
