//! High-level renderer that ties GPU context, pipelines, and a text
//! object together into a single `render_to_surface()` call.

use thiserror::Error;
use wgpu::{
    Color, CommandEncoderDescriptor, LoadOp, Operations, RenderPassColorAttachment,
    RenderPassDescriptor, StoreOp, TextureViewDescriptor,
};

use glint_text::Text;

use crate::context::GpuContext;
use crate::pipelines::outline::OutlinePipeline;
use crate::pipelines::text::TextPipeline;
use crate::vertex::TextUniforms;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("No surface configured (headless mode)")]
    NoSurface,
}

/// Frame statistics returned after each render.
#[derive(Clone, Copy, Debug)]
pub struct FrameStats {
    /// Glyphs issued to the draw call (after the visible-rune clamp).
    pub glyph_count: u32,
    /// Number of draw calls (text pass + optional outline pass).
    pub draw_calls: u32,
}

/// Renderer for laid-out text meshes.
///
/// # Usage
///
/// ```ignore
/// let mut renderer = Renderer::new(&gpu, font.atlas_size());
/// renderer.prepare(&gpu, &text);
/// let stats = renderer.render_to_surface(&gpu)?;
/// ```
pub struct Renderer {
    text_pipeline: TextPipeline,
    outline_pipeline: OutlinePipeline,
    clear_color: Color,
    atlas_uploaded: bool,
}

impl Renderer {
    /// Create a renderer; `atlas_size` sizes the glyph atlas texture.
    pub fn new(gpu: &GpuContext, atlas_size: u32) -> Self {
        let text_pipeline = TextPipeline::new(&gpu.device, gpu.surface_format, atlas_size.max(1));
        let outline_pipeline = OutlinePipeline::new(&gpu.device, gpu.surface_format);

        Self {
            text_pipeline,
            outline_pipeline,
            clear_color: Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            atlas_uploaded: false,
        }
    }

    /// Set the background clear color.
    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = Color { r, g, b, a };
    }

    /// Force a fresh atlas upload on the next `prepare` (call after the
    /// provider's pixel data changed).
    pub fn invalidate_atlas(&mut self) {
        self.atlas_uploaded = false;
    }

    /// Upload one text object's mesh, uniforms, and (once) the atlas.
    ///
    /// Call once per frame before `render_to_surface()` or
    /// `render_to_texture()`. Uploads are synchronous writes; re-preparing
    /// before a draw simply overwrites the previous buffers.
    pub fn prepare(&mut self, gpu: &GpuContext, text: &Text) {
        let uniforms = TextUniforms::for_text(text);

        self.text_pipeline
            .upload_mesh(&gpu.device, &gpu.queue, text.mesh(), text.draw_count());
        self.text_pipeline.upload_uniforms(&gpu.queue, &uniforms);

        let font = text.font();
        if !self.atlas_uploaded && font.atlas_size() > 0 {
            self.text_pipeline.upload_atlas(
                &gpu.device,
                &gpu.queue,
                font.atlas_data(),
                font.atlas_size(),
            );
            self.atlas_uploaded = true;
        }

        match text.outline() {
            Some(outline) => {
                self.outline_pipeline.upload_outline(&gpu.queue, outline);
                self.outline_pipeline.upload_uniforms(&gpu.queue, &uniforms);
            }
            None => self.outline_pipeline.clear(),
        }
    }

    fn stats(&self) -> FrameStats {
        let glyph_count = self.text_pipeline.draw_count() / 6;
        let mut draw_calls = 0;
        if glyph_count > 0 {
            draw_calls += 1;
        }
        if self.outline_pipeline.has_outline() {
            draw_calls += 1;
        }
        FrameStats {
            glyph_count,
            draw_calls,
        }
    }

    /// Render to the window surface.  Returns frame statistics.
    pub fn render_to_surface(&self, gpu: &GpuContext) -> Result<FrameStats, RenderError> {
        let surface = gpu.surface.as_ref().ok_or(RenderError::NoSurface)?;
        let output = surface.get_current_texture()?;
        let view = output.texture.create_view(&TextureViewDescriptor::default());

        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("glint_frame_encoder"),
        });

        self.record_pass(&mut encoder, &view, "glint_render_pass");

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(self.stats())
    }

    /// Render to an off-screen texture (headless mode).
    pub fn render_to_texture(
        &self,
        gpu: &GpuContext,
        target_view: &wgpu::TextureView,
    ) -> FrameStats {
        let mut encoder = gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("glint_offscreen_encoder"),
        });

        self.record_pass(&mut encoder, target_view, "glint_offscreen_pass");

        gpu.queue.submit(std::iter::once(encoder.finish()));

        self.stats()
    }

    fn record_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        label: &str,
    ) {
        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(self.clear_color),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.text_pipeline.draw(&mut pass);
        self.outline_pipeline.draw(&mut pass);
    }

    /// Access the text pipeline (for advanced usage).
    pub fn text_pipeline(&self) -> &TextPipeline {
        &self.text_pipeline
    }
}

// ===================================================================
// Tests
// ===================================================================
