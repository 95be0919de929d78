//! GPU-facing data layout for the text renderer.
//!
//! The vertex stream is the interleaved position+UV format produced by
//! `glint-text` (4 floats per vertex); the uniform block carries the
//! orthographic projection, the text's scale matrix, its NDC position, and
//! its color — the same set of per-text uniforms the draw call needs.

use bytemuck::{Pod, Zeroable};
use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexFormat, VertexStepMode};

use glint_text::{GlyphVertex, Text};

// ───────────────────────────────────────────────────────────────────
// Vertex layout
// ───────────────────────────────────────────────────────────────────

/// wgpu layout for [`GlyphVertex`]: stride 16, position at location 0 and
/// UV at location 1.
pub fn glyph_vertex_layout() -> VertexBufferLayout<'static> {
    static ATTRS: &[VertexAttribute] = &[
        // location(0) = position
        VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: VertexFormat::Float32x2,
        },
        // location(1) = uv
        VertexAttribute {
            offset: 8,
            shader_location: 1,
            format: VertexFormat::Float32x2,
        },
    ];
    VertexBufferLayout {
        array_stride: std::mem::size_of::<GlyphVertex>() as BufferAddress,
        step_mode: VertexStepMode::Vertex,
        attributes: ATTRS,
    }
}

// ───────────────────────────────────────────────────────────────────
// Per-text uniforms
// ───────────────────────────────────────────────────────────────────

/// Uniform block uploaded once per text object per frame.
///
/// 160 bytes. The vertex stage applies `ortho × scale` to the
/// origin-centered mesh and then adds the NDC position offset; the
/// fragment stage multiplies the atlas alpha by `color`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct TextUniforms {
    /// Centered-origin orthographic projection (column-major): pixels to
    /// NDC with (0,0) at the screen center and Y up.
    pub ortho: [[f32; 4]; 4],
    /// Uniform 3-axis scale from the text object.
    pub scale: [[f32; 4]; 4],
    /// Screen position, already converted to NDC.
    pub position: [f32; 2],
    /// Padding for 16-byte alignment of `color`.
    pub _pad: [f32; 2],
    /// RGBA text color.
    pub color: [f32; 4],
}

impl TextUniforms {
    /// Orthographic projection for a `width × height` pixel viewport with
    /// the origin at the screen center and Y growing upward.
    ///
    /// The layout engine centers every mesh at (0,0), so scaling through
    /// this projection zooms around the text's visual center.
    pub fn orthographic(width: f32, height: f32) -> [[f32; 4]; 4] {
        // ndc_x = world_x * 2 / width, ndc_y = world_y * 2 / height.
        let sx = 2.0 / width.max(1.0);
        let sy = 2.0 / height.max(1.0);
        [
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    /// Gather the uniform block for one text object, using the window size
    /// carried by its font provider.
    pub fn for_text(text: &Text) -> Self {
        Self {
            ortho: Self::orthographic(text.font().window_width(), text.font().window_height()),
            scale: text.scale_matrix(),
            position: text.position_ndc(),
            _pad: [0.0; 2],
            color: text.color(),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use glint_text::{FontAtlas, GlyphMetrics, UvRect};
    use std::sync::Arc;

    fn test_font() -> Arc<FontAtlas> {
        let glyph = GlyphMetrics {
            width: 10.0,
            height: 20.0,
            advance: 12.0,
            uv: UvRect { u_min: 0.0, v_min: 0.0, u_max: 0.1, v_max: 0.25 },
        };
        Arc::new(FontAtlas::new('A', vec![glyph; 3]).with_window(800.0, 600.0))
    }

    #[test]
    fn test_glyph_vertex_layout_shape() {
        let layout = glyph_vertex_layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.step_mode, VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[0].shader_location, 0); // position
        assert_eq!(layout.attributes[1].shader_location, 1); // uv
        assert_eq!(layout.attributes[1].offset, 8);
    }

    #[test]
    fn test_uniforms_size() {
        assert_eq!(std::mem::size_of::<TextUniforms>(), 160);
    }

    #[test]
    fn test_orthographic_maps_center_and_edges() {
        let m = TextUniforms::orthographic(800.0, 600.0);
        // (0,0) stays at NDC (0,0).
        assert_eq!(0.0 * m[0][0] + m[3][0], 0.0);
        // Right edge (400, 0) → NDC x = 1; top edge (0, 300) → NDC y = 1.
        assert!((400.0 * m[0][0] - 1.0).abs() < 1e-5);
        assert!((300.0 * m[1][1] - 1.0).abs() < 1e-5);
        // Left/bottom mirror to -1 (Y up, no flip).
        assert!((-400.0 * m[0][0] + 1.0).abs() < 1e-5);
        assert!((-300.0 * m[1][1] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_for_text_gathers_object_state() {
        let mut text = Text::new(test_font(), 0.5, 2.0);
        text.set_string("AB");
        text.set_position(100.0, 150.0);
        text.set_scale(1.5);
        text.set_color(0.1, 0.2, 0.3, 1.0);

        let u = TextUniforms::for_text(&text);
        assert_eq!(u.position, [100.0 / 400.0, 150.0 / 300.0]);
        assert_eq!(u.scale[0][0], 1.5);
        assert_eq!(u.color, [0.1, 0.2, 0.3, 1.0]);
        assert!((u.ortho[0][0] - 2.0 / 800.0).abs() < 1e-7);
        assert!((u.ortho[1][1] - 2.0 / 600.0).abs() < 1e-7);
    }

    #[test]
    fn test_uniforms_bytemuck_cast() {
        let u = TextUniforms::for_text(&Text::new(test_font(), 0.5, 2.0));
        let bytes = bytemuck::bytes_of(&u);
        assert_eq!(bytes.len(), 160);
        let back: &TextUniforms = bytemuck::from_bytes(bytes);
        assert_eq!(back.color, u.color);
    }
}
