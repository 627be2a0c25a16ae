use image::{Rgba, RgbaImage};
use png2svg_core::prelude::*;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("png2svg-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn sample() -> Document {
    let mut img = RgbaImage::from_pixel(3, 2, Rgba([0xff, 0x00, 0x80, 255]));
    img.put_pixel(2, 1, Rgba([0x01, 0x02, 0x03, 255]));
    convert(&img, &ConvertOptions::default()).expect("convert")
}

#[test]
fn svg_has_canvas_header_and_rects_in_order() {
    let doc = sample();
    let svg = to_svg_string(&doc);
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"width="3" height="2" viewBox="0 0 3 2""#));
    assert!(svg.trim_end().ends_with("</svg>"));

    let rects: Vec<&str> = svg.lines().filter(|l| l.starts_with("<rect")).collect();
    assert_eq!(rects.len(), doc.rects.len());
    assert_eq!(
        rects[0],
        r##"<rect x="0" y="0" width="3" height="1" fill="#ff0080"/>"##
    );
    assert_eq!(
        rects[1],
        r##"<rect x="0" y="1" width="2" height="1" fill="#ff0080"/>"##
    );
    assert_eq!(
        rects[2],
        r##"<rect x="2" y="1" width="1" height="1" fill="#010203"/>"##
    );
    assert!(!svg.contains("stroke"));
    assert!(!svg.contains("<g"));
}

#[test]
fn write_svg_creates_complete_file() {
    let dir = scratch_dir("write");
    let path = dir.join("out.svg");
    let doc = sample();
    write_svg(&doc, &path).expect("write");
    let on_disk = std::fs::read_to_string(&path).expect("read");
    assert_eq!(on_disk, to_svg_string(&doc));

    // Only the final file remains; no temporary sibling.
    let entries: Vec<_> = std::fs::read_dir(&dir)
        .expect("read_dir")
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_svg_overwrites_existing_file() {
    let dir = scratch_dir("overwrite");
    let path = dir.join("out.svg");
    std::fs::write(&path, "stale").expect("seed");
    write_svg(&sample(), &path).expect("write");
    assert!(std::fs::read_to_string(&path).expect("read").contains("<svg"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn write_svg_into_missing_directory_fails_cleanly() {
    let dir = scratch_dir("missing");
    let path = dir.join("no").join("such").join("out.svg");
    let err = write_svg(&sample(), &path).expect_err("must fail");
    assert!(matches!(err, png2svg_core::Png2SvgError::Io(_)));
    assert!(!path.exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn identical_input_gives_identical_svg() {
    let img = RgbaImage::from_fn(17, 13, |x, y| {
        Rgba([(x * 7 % 3) as u8 * 60, (y % 2) as u8 * 90, 10, if (x + y) % 5 == 0 { 0 } else { 255 }])
    });
    for opts in [
        ConvertOptions::default(),
        ConvertOptions::builder().quantize_colors(true).build(),
        ConvertOptions::builder().single_pixel_mode(true).build(),
        ConvertOptions::builder().pink_debug_color(true).build(),
    ] {
        let a = to_svg_string(&convert(&img, &opts).expect("a"));
        let b = to_svg_string(&convert(&img, &opts).expect("b"));
        assert_eq!(a, b);
    }
}
