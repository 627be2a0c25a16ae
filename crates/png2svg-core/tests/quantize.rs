use image::{Rgba, RgbaImage};
use png2svg_core::prelude::*;

#[test]
fn quantize_keeps_high_nibbles() {
    let c = Color::new(0x12, 0x34, 0x56);
    assert_eq!(c.quantize(), Color::new(0x10, 0x30, 0x50));
    assert_eq!(c.quantize().hex3(), "#135");
    assert!(!c.is_quantized());
}

#[test]
fn aligned_color_is_a_fixed_point() {
    let c = Color::new(0x10, 0x20, 0x30);
    assert_eq!(c.quantize(), c);
    assert!(c.is_quantized());
    assert_eq!(c.hex3(), "#123");
    assert_eq!(c.hex6(), "#102030");
}

#[test]
fn quantized_conversion_uses_short_fills() {
    let img = RgbaImage::from_pixel(2, 1, Rgba([0x12, 0x34, 0x56, 255]));
    let opts = ConvertOptions::builder().quantize_colors(true).build();
    let doc = convert(&img, &opts).expect("convert");
    assert!(doc.quantized);
    assert_eq!(doc.rects[0].color, Color::new(0x10, 0x30, 0x50));
    let svg = to_svg_string(&doc);
    assert!(svg.contains(r##"fill="#135""##));
    assert!(!svg.contains("#103050"));
}

#[test]
fn quantization_does_not_merge_across_distinct_sources() {
    // Both pixels quantize to #000 but differ at full precision.
    let mut img = RgbaImage::from_pixel(2, 1, Rgba([0x01, 0x01, 0x01, 255]));
    img.put_pixel(1, 0, Rgba([0x02, 0x02, 0x02, 255]));
    let opts = ConvertOptions::builder().quantize_colors(true).build();
    let doc = convert(&img, &opts).expect("convert");
    assert_eq!(doc.rects.len(), 2);
    assert!(doc.rects.iter().all(|r| r.color == Color::new(0, 0, 0)));
}

#[test]
fn single_pixel_mode_quantizes_too() {
    let img = RgbaImage::from_pixel(1, 2, Rgba([0xab, 0xcd, 0xef, 255]));
    let opts = ConvertOptions::builder()
        .single_pixel_mode(true)
        .quantize_colors(true)
        .build();
    let doc = convert(&img, &opts).expect("convert");
    assert_eq!(doc.rects.len(), 2);
    assert!(to_svg_string(&doc).contains(r##"fill="#ace""##));
}
