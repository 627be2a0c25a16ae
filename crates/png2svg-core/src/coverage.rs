/// One flag per pixel recording whether it already belongs to an emitted rectangle.
///
/// Flags only ever go from `false` to `true` during a conversion.
#[derive(Debug, Clone)]
pub struct CoverageTracker {
    width: u32,
    height: u32,
    covered: Vec<bool>,
    count: usize,
}

impl CoverageTracker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            covered: vec![false; width as usize * height as usize],
            count: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn is_covered(&self, x: u32, y: u32) -> bool {
        self.covered[self.index(x, y)]
    }

    /// Marks the inclusive rectangle `(x0, y0)..=(x1, y1)`.
    pub fn mark_covered(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        for y in y0..=y1 {
            let start = self.index(x0, y);
            let end = self.index(x1, y);
            for flag in &mut self.covered[start..=end] {
                if !*flag {
                    *flag = true;
                    self.count += 1;
                }
            }
        }
    }

    /// Number of pixels marked so far.
    pub fn covered_count(&self) -> usize {
        self.count
    }
}
