use crate::error::{Png2SvgError, Result};
use crate::model::Pixel;
use image::{DynamicImage, RgbaImage};

/// Anything that can report its size and the color of each pixel.
///
/// Implementations return errors for sources that are read lazily; the
/// in-memory `image` buffers never fail.
pub trait PixelSource {
    /// `(width, height)` in pixels.
    fn bounds(&self) -> Result<(u32, u32)>;
    /// Color and alpha at `(x, y)` for `x < width`, `y < height`.
    fn color_at(&self, x: u32, y: u32) -> Result<Pixel>;
}

impl PixelSource for RgbaImage {
    fn bounds(&self) -> Result<(u32, u32)> {
        Ok(self.dimensions())
    }

    fn color_at(&self, x: u32, y: u32) -> Result<Pixel> {
        let [r, g, b, a] = self
            .get_pixel_checked(x, y)
            .ok_or_else(|| Png2SvgError::Source(format!("pixel ({x}, {y}) out of bounds")))?
            .0;
        Ok(Pixel::new(r, g, b, a))
    }
}

impl PixelSource for DynamicImage {
    fn bounds(&self) -> Result<(u32, u32)> {
        Ok((self.width(), self.height()))
    }

    fn color_at(&self, x: u32, y: u32) -> Result<Pixel> {
        use image::GenericImageView;
        if !self.in_bounds(x, y) {
            return Err(Png2SvgError::Source(format!("pixel ({x}, {y}) out of bounds")));
        }
        let [r, g, b, a] = self.get_pixel(x, y).0;
        Ok(Pixel::new(r, g, b, a))
    }
}

/// Immutable row-major snapshot of a pixel source.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Reads every pixel of `source` once. Source errors propagate unchanged.
    pub fn from_source<S: PixelSource + ?Sized>(source: &S) -> Result<Self> {
        let (width, height) = source.bounds()?;
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Png2SvgError::InvalidDimensions { width, height })?;
        let mut pixels = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                pixels.push(source.color_at(x, y)?);
            }
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds a grid from row-major pixels; `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self> {
        if (width as usize).checked_mul(height as usize) != Some(pixels.len()) {
            return Err(Png2SvgError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn opaque_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_opaque()).count()
    }
}
