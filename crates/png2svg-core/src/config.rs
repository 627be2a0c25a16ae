use serde::{Deserialize, Serialize};

/// Options for a single conversion.
///
/// - `single_pixel_mode` skips expansion and emits one rectangle per opaque pixel
/// - `quantize_colors` reduces colors to 4096 entries (`#abcdef` -> `#ace`)
/// - `pink_debug_color` paints every merged rectangle pink; requires greedy mode
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConvertOptions {
    pub single_pixel_mode: bool,
    pub quantize_colors: bool,
    pub pink_debug_color: bool,
}

impl ConvertOptions {
    /// Validates the option combination.
    ///
    /// Pink only marks rectangles spanning more than one pixel, which
    /// single-pixel mode never produces, so the two are rejected together.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::Png2SvgError;

        if self.single_pixel_mode && self.pink_debug_color {
            return Err(Png2SvgError::InvalidConfig(
                "pink_debug_color requires greedy mode; disable single_pixel_mode".into(),
            ));
        }
        Ok(())
    }

    /// Create a fluent builder for `ConvertOptions`.
    pub fn builder() -> ConvertOptionsBuilder {
        ConvertOptionsBuilder::new()
    }
}

/// Builder for `ConvertOptions`.
#[derive(Debug, Default, Clone)]
pub struct ConvertOptionsBuilder {
    opts: ConvertOptions,
}

impl ConvertOptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: ConvertOptions::default(),
        }
    }
    pub fn single_pixel_mode(mut self, v: bool) -> Self {
        self.opts.single_pixel_mode = v;
        self
    }
    pub fn quantize_colors(mut self, v: bool) -> Self {
        self.opts.quantize_colors = v;
        self
    }
    pub fn pink_debug_color(mut self, v: bool) -> Self {
        self.opts.pink_debug_color = v;
        self
    }
    pub fn build(self) -> ConvertOptions {
        self.opts
    }
}
