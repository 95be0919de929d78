//! # glint-text
//!
//! Bitmap-font glyph layout for GPU text rendering. Converts a string plus
//! a glyph-metrics table into a quad mesh (one textured quad per glyph)
//! with a tight, origin-centered bounding box.
//!
//! ## Architecture
//!
//! ```text
//! FontAtlas (glyph metrics + UV rects)
//!     │
//!     ▼
//! layout(str, font) ──► TextMesh { Vec<GlyphVertex>, Vec<u32>, bounds }
//!     │
//!     ▼
//!   Text ◄── position / justify / scale ──► GPU upload (glint-render)
//! ```
//!
//! - **`font`** — glyph metrics table, the font/atlas provider surface.
//! - **`geometry`** — points and axis-aligned bounding boxes.
//! - **`layout`** — the quad-mesh layout engine.
//! - **`text`** — caller-facing text object with post-layout transforms.

pub mod font;
pub mod geometry;
pub mod layout;
pub mod text;

// Re-exports for ergonomic use.
pub use font::{FontAtlas, GlyphMetrics, UvRect};
pub use geometry::{BoundingBox, Point};
pub use layout::{layout, GlyphVertex, OutlineMesh, TextMesh};
pub use text::{Align, LayoutState, Text};
