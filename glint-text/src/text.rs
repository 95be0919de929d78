//! Caller-facing text object — owns the current string, its laid-out mesh,
//! and the post-layout transforms (position, justification, scale clamp).
//!
//! All operations are immediate-mode and single-threaded: a `Text` is owned
//! exclusively by the thread driving the render loop, and every call
//! completes before returning. No failure path here is fatal — out-of-range
//! scales are rejected with a `bool`, table misses degrade to "no visible
//! glyph", and ordering violations are logged, not enforced.

use std::sync::Arc;

use log::warn;

use crate::font::FontAtlas;
use crate::geometry::{BoundingBox, Point};
use crate::layout::{layout_runes, OutlineMesh, TextMesh};

/// Horizontal block justification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Lifecycle of a `Text`'s geometry.
///
/// `set_position` before any layout has nothing to translate; the state tag
/// makes that explicit instead of sniffing for a zero-valued box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutState {
    /// No string has been laid out yet.
    #[default]
    Uninitialized,
    /// Geometry exists, centered at the origin.
    LaidOut,
    /// Geometry exists and a screen position has been applied to the box.
    Positioned,
}

/// A string rendered as a textured quad mesh.
///
/// Created against one font/atlas provider and one scale range; the mesh is
/// rebuilt on every [`set_string`](Text::set_string) and the remembered
/// anchor is reapplied so the text stays put across relayouts.
pub struct Text {
    font: Arc<FontAtlas>,
    /// The string actually laid out (after truncation).
    string: String,
    mesh: TextMesh,
    /// Bounding-box outline for the debug overlay, rebuilt per layout.
    outline: Option<OutlineMesh>,

    scale: f32,
    scale_min: f32,
    scale_max: f32,
    scale_matrix: [[f32; 4]; 4],

    /// RGBA text color.
    color: [f32; 4],
    /// GPU-facing position in normalized device coordinates.
    position_ndc: [f32; 2],
    /// Last screen-space anchor requested by the caller, `None` until
    /// `set_position` has been called. Justification derives from this and
    /// never overwrites it, which is what makes repeated same-alignment
    /// `justify` calls idempotent.
    anchor: Option<Point>,

    /// How many prefix glyphs are drawn; defaults to the full string.
    visible_runes: usize,
    /// Truncation limit for incoming strings; 0 disables truncation.
    max_runes: usize,

    state: LayoutState,
    /// Per-object diagnostics flag (buffer dumps + outline mesh).
    debug: bool,
}

fn uniform_scale(s: f32) -> [[f32; 4]; 4] {
    [
        [s, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, s, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

impl Text {
    /// Create a text object bound to `font` with scale clamped to
    /// `[scale_min, scale_max]`.
    ///
    /// The initial scale is 1.0, clamped into the range, so the object
    /// always starts with a valid scale matrix.
    pub fn new(font: Arc<FontAtlas>, scale_min: f32, scale_max: f32) -> Self {
        let scale = 1.0f32.clamp(scale_min, scale_max);
        Self {
            font,
            string: String::new(),
            mesh: TextMesh::default(),
            outline: None,
            scale,
            scale_min,
            scale_max,
            scale_matrix: uniform_scale(scale),
            color: [1.0, 1.0, 1.0, 1.0],
            position_ndc: [0.0, 0.0],
            anchor: None,
            visible_runes: 0,
            max_runes: 0,
            state: LayoutState::default(),
            debug: false,
        }
    }

    // ── Layout ──────────────────────────────────────────────────────

    /// Replace the string and rebuild the quad mesh.
    ///
    /// Empty input is a no-op: the prior layout is left untouched. When a
    /// truncation limit is set and the input is longer, only the first
    /// `max_runes` characters are kept (silently). A previously set anchor
    /// is reapplied afterwards so re-layout does not move the text; without
    /// one the mesh stays origin-centered in the `LaidOut` state.
    pub fn set_string(&mut self, s: &str) {
        let mut runes: Vec<char> = s.chars().collect();
        if runes.is_empty() {
            return;
        }
        if self.max_runes > 0 && runes.len() > self.max_runes {
            runes.truncate(self.max_runes);
        }

        self.string = runes.iter().collect();
        self.mesh = layout_runes(&runes, &self.font);
        self.visible_runes = self.mesh.glyph_count();
        self.state = LayoutState::LaidOut;

        self.outline = if self.debug {
            self.mesh.dump("set_string");
            self.mesh.bounds.as_ref().map(OutlineMesh::from_bounds)
        } else {
            None
        };

        if let Some(Point { x, y }) = self.anchor {
            self.set_position(x, y);
        }
    }

    /// Maximum characters kept by `set_string`; 0 disables truncation.
    pub fn set_max_runes(&mut self, max: usize) {
        self.max_runes = max;
    }

    /// The string currently laid out (post-truncation).
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Number of laid-out glyphs.
    pub fn len(&self) -> usize {
        self.mesh.glyph_count()
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }

    /// Whether the font table covers `rune`.
    pub fn has_rune(&self, rune: char) -> bool {
        self.font.has_glyph(rune)
    }

    pub fn font(&self) -> &FontAtlas {
        &self.font
    }

    pub fn mesh(&self) -> &TextMesh {
        &self.mesh
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    // ── Position and justification ──────────────────────────────────

    /// Anchor the text at screen-space `(x, y)` and remember the anchor for
    /// later relayouts.
    ///
    /// Soft precondition: the bounding box should be origin-centered
    /// (post-layout state); calling this twice in a row accumulates box
    /// translation. Violations are logged, never rejected.
    pub fn set_position(&mut self, x: f32, y: f32) {
        if self.state == LayoutState::Positioned {
            warn!("set_position on an already positioned box: the screen translation accumulates");
        }
        self.anchor = Some(Point { x, y });
        self.apply_position(x, y);
    }

    /// NDC conversion + screen-space box translation, without touching the
    /// remembered anchor.
    fn apply_position(&mut self, x: f32, y: f32) {
        if self.state == LayoutState::Uninitialized {
            warn!("set_position before layout: bounding box is unset");
        }

        // Orthographic shader coordinates range -1 to 1.
        let half_w = self.font.window_width() / 2.0;
        let half_h = self.font.window_height() / 2.0;
        if half_w > 0.0 && half_h > 0.0 {
            self.position_ndc = [x / half_w, y / half_h];
        } else {
            warn!("window size unset: screen position not converted to NDC");
            self.position_ndc = [0.0, 0.0];
        }

        // Screen-space box, for click/hover detection.
        if let Some(b) = self.mesh.bounds {
            self.mesh.bounds = Some(b.translate(x, y));
        }

        if self.state != LayoutState::Uninitialized {
            self.state = LayoutState::Positioned;
        }
    }

    /// Justify the block left or right of the remembered anchor.
    ///
    /// Recovers the origin-centered box from the current (positioned) one,
    /// then re-applies the position with the anchor shifted by half the
    /// text width. Algebraic inverse-then-forward, not a stored toggle:
    /// repeating the same alignment yields the same box and anchor.
    pub fn justify(&mut self, align: Align) {
        let Some(b) = self.mesh.bounds else {
            warn!("justify on empty layout: no-op");
            return;
        };
        let sign = match align {
            Align::Left => 1.0,
            Align::Right => -1.0,
        };
        let anchor = self.anchor.unwrap_or_default();
        let x = anchor.x + sign * b.width() / 2.0;
        let y = anchor.y;

        // apply_position expects an origin-centered box.
        self.mesh.bounds = Some(b.centered());
        self.apply_position(x, y);
    }

    /// Screen-space bounding box, `None` until something has been laid out.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.mesh.bounds
    }

    /// Text width in screen coordinates (0 when empty).
    pub fn width(&self) -> f32 {
        self.mesh.bounds.map_or(0.0, |b| b.width())
    }

    /// Text height in screen coordinates (0 when empty).
    pub fn height(&self) -> f32 {
        self.mesh.bounds.map_or(0.0, |b| b.height())
    }

    /// The remembered screen-space anchor; `(0, 0)` until `set_position`
    /// has been called.
    pub fn anchor(&self) -> Point {
        self.anchor.unwrap_or_default()
    }

    /// GPU-facing position in normalized device coordinates.
    pub fn position_ndc(&self) -> [f32; 2] {
        self.position_ndc
    }

    /// Hit-test a screen-space point against the positioned box.
    pub fn contains(&self, p: Point) -> bool {
        self.mesh.bounds.is_some_and(|b| b.contains(p))
    }

    // ── Scale ───────────────────────────────────────────────────────

    /// Set the scale. Returns `false` (and mutates nothing) when `s` falls
    /// outside `[scale_min, scale_max]`.
    pub fn set_scale(&mut self, s: f32) -> bool {
        if s < self.scale_min || s > self.scale_max {
            return false;
        }
        self.scale = s;
        self.scale_matrix = uniform_scale(s);
        true
    }

    /// Nudge the scale by `delta`, with the same clamp semantics as
    /// [`set_scale`](Text::set_scale).
    pub fn add_scale(&mut self, delta: f32) -> bool {
        self.set_scale(self.scale + delta)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Uniform 3-axis scale transform for the rendering step.
    pub fn scale_matrix(&self) -> [[f32; 4]; 4] {
        self.scale_matrix
    }

    // ── Color, visibility, diagnostics ──────────────────────────────

    pub fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.color = [r, g, b, a];
    }

    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Draw only the first `count` glyphs of the laid-out string.
    pub fn set_visible_runes(&mut self, count: usize) {
        self.visible_runes = count;
    }

    pub fn visible_runes(&self) -> usize {
        self.visible_runes
    }

    /// Index count for the GPU draw call: `visible_runes × 6`, clamped to
    /// the index buffer length.
    pub fn draw_count(&self) -> u32 {
        (self.visible_runes * 6).min(self.mesh.indices.len()) as u32
    }

    /// Toggle the diagnostics side channel (buffer dumps + outline mesh on
    /// the next layout). Per-object, so tests can flip it freely.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Bounding-box outline mesh, present only for debug-flagged layouts.
    pub fn outline(&self) -> Option<&OutlineMesh> {
        self.outline.as_ref()
    }
}

// ===================================================================
// Tests
// ===================================================================
