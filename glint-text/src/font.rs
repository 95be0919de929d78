//! Font/atlas provider surface — per-glyph metrics and UV rectangles.
//!
//! Font file parsing and atlas packing happen elsewhere; this module only
//! describes what a provider hands the layout engine: a dense metrics table
//! covering a contiguous codepoint range `[low, low + N)`, the window size
//! used for NDC conversion, and (optionally) the RGBA atlas pixels a
//! renderer can upload.

use crate::geometry::Point;

/// A glyph's rectangle within the atlas texture (UV coordinates
/// normalized to [0, 1]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    /// Top-left U coordinate.
    pub u_min: f32,
    /// Top-left V coordinate.
    pub v_min: f32,
    /// Bottom-right U coordinate.
    pub u_max: f32,
    /// Bottom-right V coordinate.
    pub v_max: f32,
}

impl UvRect {
    /// Top-left corner as a point.
    pub fn top_left(&self) -> Point {
        Point { x: self.u_min, y: self.v_min }
    }

    /// Bottom-right corner as a point.
    pub fn bottom_right(&self) -> Point {
        Point { x: self.u_max, y: self.v_max }
    }
}

/// Per-glyph record: quad size, pen advance, and atlas UV rectangle.
///
/// Immutable once loaded; owned by the provider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphMetrics {
    /// Quad width in screen pixels.
    pub width: f32,
    /// Quad height in screen pixels.
    pub height: f32,
    /// Horizontal pen distance consumed by this glyph.
    pub advance: f32,
    /// UV rectangle into the shared atlas texture.
    pub uv: UvRect,
}

/// The font/atlas provider: a dense glyph table indexed by
/// `codepoint - low`.
///
/// Codepoints outside `[low, low + glyph_count)` have no entry; the layout
/// engine skips them silently.
pub struct FontAtlas {
    /// First codepoint covered by the table.
    low: char,
    /// Metrics for `low`, `low + 1`, … in order.
    glyphs: Vec<GlyphMetrics>,
    /// Viewport size in pixels, used to convert screen positions to NDC.
    window_width: f32,
    window_height: f32,
    /// Atlas texture width = height in pixels (0 when no pixels attached).
    atlas_size: u32,
    /// RGBA atlas pixels (`atlas_size * atlas_size * 4` bytes), for GPU
    /// upload by the rendering side. Empty when the texture lives elsewhere.
    atlas_data: Vec<u8>,
}

impl FontAtlas {
    /// Create a provider for the codepoint range `[low, low + glyphs.len())`.
    pub fn new(low: char, glyphs: Vec<GlyphMetrics>) -> Self {
        Self {
            low,
            glyphs,
            window_width: 0.0,
            window_height: 0.0,
            atlas_size: 0,
            atlas_data: Vec::new(),
        }
    }

    /// Attach the viewport size used for NDC conversion.
    pub fn with_window(mut self, width: f32, height: f32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Attach RGBA atlas pixels (`size * size * 4` bytes).
    pub fn with_atlas(mut self, size: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (size as usize) * (size as usize) * 4);
        self.atlas_size = size;
        self.atlas_data = data;
        self
    }

    /// Update the viewport size (e.g. after a window resize).
    pub fn set_window(&mut self, width: f32, height: f32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Metrics for `rune`, or `None` when the codepoint falls outside
    /// `[low, low + glyph_count)`.
    pub fn metrics(&self, rune: char) -> Option<&GlyphMetrics> {
        let index = (rune as u32).checked_sub(self.low as u32)? as usize;
        self.glyphs.get(index)
    }

    /// Whether the table covers `rune`.
    pub fn has_glyph(&self, rune: char) -> bool {
        self.metrics(rune).is_some()
    }

    /// Number of glyphs in the table.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// First codepoint covered by the table.
    pub fn low(&self) -> char {
        self.low
    }

    pub fn window_width(&self) -> f32 {
        self.window_width
    }

    pub fn window_height(&self) -> f32 {
        self.window_height
    }

    /// Atlas texture size in pixels (0 when no pixels attached).
    pub fn atlas_size(&self) -> u32 {
        self.atlas_size
    }

    /// RGBA atlas pixels, empty when the texture lives elsewhere.
    pub fn atlas_data(&self) -> &[u8] {
        &self.atlas_data
    }
}

// ===================================================================
// Tests
// ===================================================================
