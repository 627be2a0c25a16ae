use image::{Rgba, RgbaImage};
use png2svg_core::prelude::*;
use rand::{Rng, SeedableRng};

fn random_image(rng: &mut rand::rngs::StdRng, w: u32, h: u32) -> RgbaImage {
    let palette = [
        Rgba([255, 0, 0, 255]),
        Rgba([0, 200, 0, 255]),
        Rgba([10, 20, 30, 128]),
        Rgba([0, 0, 0, 0]),
    ];
    let mut img = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            img.put_pixel(x, y, palette[rng.gen_range(0..palette.len())]);
        }
    }
    img
}

/// Every opaque pixel is drawn exactly once, with its own color; transparent
/// pixels are never drawn.
fn assert_exact_cover(img: &RgbaImage, doc: &Document) {
    let (w, h) = img.dimensions();
    let mut hits = vec![0u32; (w * h) as usize];
    for fr in &doc.rects {
        for y in fr.rect.y..fr.rect.y + fr.rect.h {
            for x in fr.rect.x..fr.rect.x + fr.rect.w {
                let p = img.get_pixel(x, y);
                assert_ne!(p[3], 0, "transparent pixel ({x}, {y}) drawn");
                assert_eq!(Color::new(p[0], p[1], p[2]), fr.color);
                hits[(y * w + x) as usize] += 1;
            }
        }
    }
    for (i, a) in doc.rects.iter().enumerate() {
        for b in &doc.rects[i + 1..] {
            assert!(!a.rect.overlaps(&b.rect), "{:?} overlaps {:?}", a.rect, b.rect);
        }
    }
    let grid = PixelGrid::from_source(img).expect("grid");
    assert_eq!(doc.stats().covered_pixels, grid.opaque_count() as u64);
    for y in 0..h {
        for x in 0..w {
            let expected = if img.get_pixel(x, y)[3] != 0 { 1 } else { 0 };
            assert_eq!(hits[(y * w + x) as usize], expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn greedy_cover_is_exact_and_disjoint() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    for _ in 0..40 {
        let w = rng.gen_range(1..=24);
        let h = rng.gen_range(1..=24);
        let img = random_image(&mut rng, w, h);
        let doc = convert(&img, &ConvertOptions::default()).expect("convert");
        assert_exact_cover(&img, &doc);
    }
}

#[test]
fn single_pixel_cover_is_exact_and_disjoint() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(11);
    let opts = ConvertOptions::builder().single_pixel_mode(true).build();
    for _ in 0..20 {
        let w = rng.gen_range(1..=16);
        let h = rng.gen_range(1..=16);
        let img = random_image(&mut rng, w, h);
        let doc = convert(&img, &opts).expect("convert");
        assert_exact_cover(&img, &doc);
        let opaque = img.pixels().filter(|p| p[3] != 0).count();
        assert_eq!(doc.rects.len(), opaque);
    }
}

#[test]
fn greedy_never_emits_more_than_single_pixel() {
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let single = ConvertOptions::builder().single_pixel_mode(true).build();
    for _ in 0..30 {
        let w = rng.gen_range(2..=20);
        let h = rng.gen_range(2..=20);
        let img = random_image(&mut rng, w, h);
        let g = convert(&img, &ConvertOptions::default()).expect("greedy");
        let s = convert(&img, &single).expect("single");
        assert!(g.rects.len() <= s.rects.len());
    }
}

#[test]
fn one_adjacent_pair_makes_greedy_strictly_smaller() {
    // Checkerboard has no same-colored neighbours: counts are equal.
    let a = Rgba([1, 2, 3, 255]);
    let b = Rgba([4, 5, 6, 255]);
    let mut img = RgbaImage::from_fn(6, 6, |x, y| if (x + y) % 2 == 0 { a } else { b });
    let single = ConvertOptions::builder().single_pixel_mode(true).build();
    let g = convert(&img, &ConvertOptions::default()).expect("greedy");
    let s = convert(&img, &single).expect("single");
    assert_eq!(g.rects.len(), s.rects.len());

    // Making two horizontal neighbours equal lets greedy merge them.
    img.put_pixel(1, 0, a);
    let g = convert(&img, &ConvertOptions::default()).expect("greedy");
    let s = convert(&img, &single).expect("single");
    assert!(g.rects.len() < s.rects.len());
    assert_exact_cover(&img, &g);
}

#[test]
fn stats_match_document() {
    let mut img = RgbaImage::from_pixel(4, 3, Rgba([9, 9, 9, 255]));
    img.put_pixel(3, 2, Rgba([0, 0, 0, 0]));
    let doc = convert(&img, &ConvertOptions::default()).expect("convert");
    let stats = doc.stats();
    assert_eq!(stats.covered_pixels, 11);
    assert_eq!(stats.transparent_pixels(), 1);
    assert_eq!(stats.num_rects, doc.rects.len());
    assert_eq!(stats.distinct_colors, 1);
    assert_eq!(stats.largest_rect_area, 8);
}
