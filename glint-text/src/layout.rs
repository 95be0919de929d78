//! Glyph layout engine — string + metrics table → textured quad mesh.
//!
//! Each laid-out glyph contributes one quad: 4 vertices (position + UV,
//! counter-clockwise from bottom-left) and 6 triangle indices. The pen
//! moves left to right along a single baseline at `y = 0`; after emission
//! the whole mesh is recentered so its bounding box is symmetric about the
//! origin.

use bytemuck::{Pod, Zeroable};
use log::debug;

use crate::font::FontAtlas;
use crate::geometry::{BoundingBox, Point};

/// One quad corner: interleaved position + UV, 4 floats / 16 bytes.
///
/// This is exactly the wire format the rendering context consumes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GlyphVertex {
    /// Position in screen pixels, centered at the origin after layout.
    pub position: [f32; 2],
    /// UV coordinates into the atlas texture.
    pub uv: [f32; 2],
}

/// Triangle indices for one quad, relative to its own 4 vertices.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// The layout result: vertex and index buffers plus the bounding box.
///
/// Rebuilt wholesale on every layout (replace, not patch-in-place), so a
/// shorter string can never leave stale geometry behind. `bounds` is `None`
/// when zero glyphs were emitted — an empty mesh is an explicit state, not
/// a zero-valued box.
#[derive(Clone, Debug, Default)]
pub struct TextMesh {
    /// 4 vertices per laid-out glyph, in emission order.
    pub vertices: Vec<GlyphVertex>,
    /// 6 indices per laid-out glyph, offset by 4 × glyph index.
    pub indices: Vec<u32>,
    /// Tight box around all vertex positions, `None` when nothing was
    /// emitted (empty input or every codepoint skipped).
    pub bounds: Option<BoundingBox>,
}

impl TextMesh {
    /// Number of laid-out glyphs.
    pub fn glyph_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Whether the mesh holds no geometry.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex buffer as a flat `&[f32]` (4 floats per vertex).
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The vertex buffer as raw bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Shift every vertex position and the bounding box by `offset`.
    fn shift(&mut self, offset: Point) {
        for v in &mut self.vertices {
            v.position[0] += offset.x;
            v.position[1] += offset.y;
        }
        if let Some(b) = self.bounds {
            self.bounds = Some(b.translate(offset.x, offset.y));
        }
    }

    /// Recenter the mesh so the bounding box is symmetric about the origin.
    fn recenter(&mut self) {
        if let Some(b) = self.bounds {
            self.shift(b.center_offset());
        }
    }

    /// Log the bounding box, vertex data, and index data at debug level.
    pub fn dump(&self, label: &str) {
        debug!("{label} bounding box: {:?}", self.bounds);
        debug!("{label} vertex data: {:?}", self.vertex_floats());
        debug!("{label} index data: {:?}", self.indices);
    }
}

/// Lay out `text` against `font`, producing a quad mesh centered at the
/// origin.
///
/// When `max_runes > 0` and the input is longer, only the first `max_runes`
/// characters are laid out; the rest are discarded silently. Codepoints the
/// table does not cover are skipped: no geometry, no pen advance. Empty
/// input yields an empty mesh with `bounds == None`.
pub fn layout(text: &str, font: &FontAtlas, max_runes: usize) -> TextMesh {
    let mut runes: Vec<char> = text.chars().collect();
    if max_runes > 0 && runes.len() > max_runes {
        runes.truncate(max_runes);
    }
    layout_runes(&runes, font)
}

/// Layout over an already-truncated rune slice.
pub(crate) fn layout_runes(runes: &[char], font: &FontAtlas) -> TextMesh {
    let mut mesh = TextMesh {
        vertices: Vec::with_capacity(runes.len() * 4),
        indices: Vec::with_capacity(runes.len() * 6),
        bounds: None,
    };

    // Pen position along the single baseline. Currently only left-to-right
    // text flow is supported.
    let mut line_x = 0.0f32;
    let mut base = 0u32;

    for &rune in runes {
        let Some(metrics) = font.metrics(rune) else {
            // Table miss: skip, no advance.
            continue;
        };
        let (w, h) = (metrics.width, metrics.height);
        let uv = metrics.uv;

        // Counter-clockwise quad from the bottom-left corner at the pen.
        // The quad's bottom edge samples the UV rect's bottom V, the top
        // edge its top V — the texture is not flipped further.
        let quad = [
            GlyphVertex { position: [line_x, 0.0], uv: [uv.u_min, uv.v_max] },
            GlyphVertex { position: [line_x + w, 0.0], uv: [uv.u_max, uv.v_max] },
            GlyphVertex { position: [line_x + w, h], uv: [uv.u_max, uv.v_min] },
            GlyphVertex { position: [line_x, h], uv: [uv.u_min, uv.v_min] },
        ];

        for vertex in quad {
            let p = Point { x: vertex.position[0], y: vertex.position[1] };
            mesh.bounds = Some(match mesh.bounds {
                Some(b) => b.expand(p),
                None => BoundingBox::from_point(p),
            });
            mesh.vertices.push(vertex);
        }

        mesh.indices.extend(QUAD_INDICES.iter().map(|i| i + base));
        base += 4;
        line_x += metrics.advance;
    }

    // Center the geometry at (0,0) so scaling under the orthographic
    // projection zooms around the text's visual center.
    mesh.recenter();
    mesh
}

/// Line-list mesh outlining a bounding box, for the debug overlay.
#[derive(Clone, Copy, Debug)]
pub struct OutlineMesh {
    /// The 4 box corners, counter-clockwise from the lower-left. UVs are
    /// unused by the outline shader and left at zero.
    pub vertices: [GlyphVertex; 4],
    /// Line-list indices: 4 edges, 2 endpoints each.
    pub indices: [u32; 8],
}

impl OutlineMesh {
    pub fn from_bounds(b: &BoundingBox) -> Self {
        let corner = |x: f32, y: f32| GlyphVertex { position: [x, y], uv: [0.0, 0.0] };
        Self {
            vertices: [
                corner(b.min.x, b.min.y),
                corner(b.max.x, b.min.y),
                corner(b.max.x, b.max.y),
                corner(b.min.x, b.max.y),
            ],
            indices: [0, 1, 1, 2, 2, 3, 3, 0],
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{GlyphMetrics, UvRect};

    /// Table covering 'A'..='C': "A" is 10×20 with advance 12.
    fn test_font() -> FontAtlas {
        let glyph = |width: f32, u0: f32| GlyphMetrics {
            width,
            height: 20.0,
            advance: width + 2.0,
            uv: UvRect { u_min: u0, v_min: 0.0, u_max: u0 + 0.1, v_max: 0.25 },
        };
        FontAtlas::new('A', vec![glyph(10.0, 0.0), glyph(8.0, 0.1), glyph(6.0, 0.2)])
            .with_window(800.0, 600.0)
    }

    #[test]
    fn test_buffer_length_law() {
        let font = test_font();
        for (text, glyphs) in [("A", 1), ("AB", 2), ("ABC", 3), ("ABAB", 4)] {
            let mesh = layout(text, &font, 0);
            assert_eq!(mesh.glyph_count(), glyphs);
            assert_eq!(mesh.vertices.len(), glyphs * 4);
            assert_eq!(mesh.vertex_floats().len(), glyphs * 16);
            assert_eq!(mesh.indices.len(), glyphs * 6);
        }
    }

    #[test]
    fn test_single_glyph_centered_box() {
        let font = test_font();
        let mesh = layout("A", &font, 0);
        let b = mesh.bounds.unwrap();
        // 10×20 glyph: box (-5,-10)..(5,10), symmetric about the origin.
        assert_eq!(b.min, Point { x: -5.0, y: -10.0 });
        assert_eq!(b.max, Point { x: 5.0, y: 10.0 });
    }

    #[test]
    fn test_centering_symmetry() {
        let font = test_font();
        let mesh = layout("ABCA", &font, 0);
        let b = mesh.bounds.unwrap();
        assert!((b.min.x + b.max.x).abs() < 1e-4, "box not x-symmetric: {b:?}");
        assert!((b.min.y + b.max.y).abs() < 1e-4, "box not y-symmetric: {b:?}");
    }

    #[test]
    fn test_bounding_box_tight() {
        let font = test_font();
        let mesh = layout("ABC", &font, 0);
        let b = mesh.bounds.unwrap();

        let mut touches = [false; 4]; // left, right, bottom, top
        for v in &mesh.vertices {
            let [x, y] = v.position;
            assert!(x >= b.min.x - 1e-5 && x <= b.max.x + 1e-5);
            assert!(y >= b.min.y - 1e-5 && y <= b.max.y + 1e-5);
            touches[0] |= (x - b.min.x).abs() < 1e-5;
            touches[1] |= (x - b.max.x).abs() < 1e-5;
            touches[2] |= (y - b.min.y).abs() < 1e-5;
            touches[3] |= (y - b.max.y).abs() < 1e-5;
        }
        assert_eq!(touches, [true; 4], "some box edge is not touched");
    }

    #[test]
    fn test_index_pattern_per_glyph() {
        let font = test_font();
        let mesh = layout("AB", &font, 0);
        assert_eq!(mesh.indices[..6], [0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.indices[6..], [4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_vertex_order_counter_clockwise() {
        let font = test_font();
        let mesh = layout("A", &font, 0);
        let [bl, br, tr, tl] = [
            mesh.vertices[0].position,
            mesh.vertices[1].position,
            mesh.vertices[2].position,
            mesh.vertices[3].position,
        ];
        // Bottom-left → bottom-right → top-right → top-left.
        assert!(bl[0] < br[0] && bl[1] == br[1]);
        assert!(tr[1] > br[1] && tr[0] == br[0]);
        assert!(tl[0] < tr[0] && tl[1] == tr[1]);
    }

    #[test]
    fn test_uv_mapping_bottom_edge_uses_bottom_v() {
        let font = test_font();
        let mesh = layout("A", &font, 0);
        let uv = font.metrics('A').unwrap().uv;
        // Bottom edge (vertices 0, 1) carries v_max; top edge v_min.
        assert_eq!(mesh.vertices[0].uv, [uv.u_min, uv.v_max]);
        assert_eq!(mesh.vertices[1].uv, [uv.u_max, uv.v_max]);
        assert_eq!(mesh.vertices[2].uv, [uv.u_max, uv.v_min]);
        assert_eq!(mesh.vertices[3].uv, [uv.u_min, uv.v_min]);
    }

    #[test]
    fn test_pen_advance_between_glyphs() {
        let font = test_font();
        let mesh = layout("AA", &font, 0);
        // Second glyph's bottom-left sits one advance (12) right of the
        // first's, regardless of the recentering shift.
        let first = mesh.vertices[0].position[0];
        let second = mesh.vertices[4].position[0];
        assert!((second - first - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_truncation_keeps_prefix() {
        let font = test_font();
        let full = layout("ABCAB", &font, 0);
        let cut = layout("ABCAB", &font, 3);
        assert_eq!(full.glyph_count(), 5);
        assert_eq!(cut.glyph_count(), 3);
        // Prefix geometry matches a direct 3-rune layout.
        let direct = layout("ABC", &font, 0);
        assert_eq!(cut.vertices, direct.vertices);
        assert_eq!(cut.indices, direct.indices);
    }

    #[test]
    fn test_truncation_not_applied_when_shorter() {
        let font = test_font();
        let mesh = layout("AB", &font, 10);
        assert_eq!(mesh.glyph_count(), 2);
    }

    #[test]
    fn test_skip_contributes_nothing() {
        let font = test_font();
        // 'z' and '!' are outside ['A', 'D'); geometry must match "AB".
        let skipped = layout("A!zB", &font, 0);
        let plain = layout("AB", &font, 0);
        assert_eq!(skipped.glyph_count(), 2);
        assert_eq!(skipped.vertices, plain.vertices);
        assert_eq!(skipped.indices, plain.indices);
        assert_eq!(skipped.bounds, plain.bounds);
    }

    #[test]
    fn test_empty_input_empty_mesh() {
        let font = test_font();
        let mesh = layout("", &font, 0);
        assert!(mesh.is_empty());
        assert_eq!(mesh.glyph_count(), 0);
        assert!(mesh.bounds.is_none());
    }

    #[test]
    fn test_all_skipped_has_no_bounds() {
        let font = test_font();
        let mesh = layout("xyz!?", &font, 0);
        assert!(mesh.is_empty());
        assert!(mesh.bounds.is_none(), "all-skipped layout must not fake a zero box");
    }

    #[test]
    fn test_glyph_vertex_is_16_bytes() {
        assert_eq!(std::mem::size_of::<GlyphVertex>(), 16);
    }

    #[test]
    fn test_vertex_bytes_cast() {
        let font = test_font();
        let mesh = layout("A", &font, 0);
        assert_eq!(mesh.vertex_bytes().len(), 4 * 16);
        assert_eq!(mesh.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_outline_mesh_corners() {
        let b = BoundingBox {
            min: Point { x: -5.0, y: -10.0 },
            max: Point { x: 5.0, y: 10.0 },
        };
        let outline = OutlineMesh::from_bounds(&b);
        assert_eq!(outline.vertices[0].position, [-5.0, -10.0]);
        assert_eq!(outline.vertices[2].position, [5.0, 10.0]);
        // Every edge endpoint references a valid corner.
        assert!(outline.indices.iter().all(|&i| i < 4));
    }
}
