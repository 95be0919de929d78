//! Text render pipeline — indexed drawing of the per-glyph quad mesh.
//!
//! Consumes the interleaved position+UV vertex buffer and `u32` index
//! buffer built by the layout engine. Both GPU buffers grow by
//! reallocate-and-replace when a mesh outgrows them; a shrinking mesh just
//! draws fewer indices, so stale tail data is never referenced.

use log::debug;
use wgpu::{
    AddressMode, BindGroup, BindGroupDescriptor, BindGroupEntry,
    BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingResource, BindingType, BlendState, Buffer, BufferBindingType,
    BufferDescriptor, BufferUsages, ColorTargetState, ColorWrites, Device,
    Extent3d, FilterMode, FragmentState, FrontFace, IndexFormat,
    MultisampleState, PipelineCompilationOptions, PipelineLayoutDescriptor,
    PolygonMode, PrimitiveState, PrimitiveTopology, Queue, RenderPass,
    RenderPipeline, RenderPipelineDescriptor, SamplerBindingType,
    SamplerDescriptor, ShaderModuleDescriptor, ShaderStages, Texture,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType,
    TextureUsages, TextureViewDimension, VertexState,
};

use glint_text::{GlyphVertex, TextMesh};

use crate::vertex::{glyph_vertex_layout, TextUniforms};

/// Initial buffer capacity, in glyphs. Buffers regrow past this.
const INITIAL_GLYPH_CAPACITY: usize = 256;

const VERTEX_BYTES_PER_GLYPH: u64 = (4 * std::mem::size_of::<GlyphVertex>()) as u64;
const INDEX_BYTES_PER_GLYPH: u64 = (6 * std::mem::size_of::<u32>()) as u64;

/// Owns the wgpu pipeline, mesh buffers, atlas texture, and bind groups
/// for text.
pub struct TextPipeline {
    pipeline: RenderPipeline,

    // Mesh geometry, regrown on demand.
    vertex_buffer: Buffer,
    vertex_capacity: u64,
    index_buffer: Buffer,
    index_capacity: u64,

    /// Indices issued by the next draw (already clamped).
    draw_count: u32,

    // Per-text uniforms.
    uniform_buffer: Buffer,
    uniform_bind_group: BindGroup,

    // Atlas texture.
    atlas_texture: Texture,
    atlas_bind_group: BindGroup,
    atlas_bgl: BindGroupLayout,
    atlas_size: u32,
}

fn create_vertex_buffer(device: &Device, capacity: u64) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some("glint_text_vb"),
        size: capacity,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &Device, capacity: u64) -> Buffer {
    device.create_buffer(&BufferDescriptor {
        label: Some("glint_text_ib"),
        size: capacity,
        usage: BufferUsages::INDEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_atlas_texture(device: &Device, size: u32) -> Texture {
    device.create_texture(&TextureDescriptor {
        label: Some("glint_glyph_atlas"),
        size: Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::Rgba8UnormSrgb,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn create_atlas_bind_group(device: &Device, bgl: &BindGroupLayout, texture: &Texture) -> BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&SamplerDescriptor {
        label: Some("glint_glyph_atlas_sampler"),
        address_mode_u: AddressMode::ClampToEdge,
        address_mode_v: AddressMode::ClampToEdge,
        mag_filter: FilterMode::Linear,
        min_filter: FilterMode::Linear,
        ..Default::default()
    });
    device.create_bind_group(&BindGroupDescriptor {
        label: Some("glint_text_atlas_bg"),
        layout: bgl,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(&sampler),
            },
        ],
    })
}

impl TextPipeline {
    /// Create the text pipeline and allocate GPU resources.
    ///
    /// `atlas_size` is the width = height of the glyph atlas texture.
    pub fn new(device: &Device, surface_format: TextureFormat, atlas_size: u32) -> Self {
        // ── Shader ──────────────────────────────────────────────
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("glint_text_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/text.wgsl").into()),
        });

        // ── Uniform bind group layout (group 0) ─────────────────
        let uniform_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("glint_text_uniform_bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        // ── Atlas bind group layout (group 1) ───────────────────
        let atlas_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("glint_text_atlas_bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // ── Pipeline ────────────────────────────────────────────
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("glint_text_pipeline_layout"),
            bind_group_layouts: &[&uniform_bgl, &atlas_bgl],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("glint_text_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                buffers: &[glyph_vertex_layout()],
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: PipelineCompilationOptions::default(),
                targets: &[Some(ColorTargetState {
                    format: surface_format,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // ── Mesh buffers ────────────────────────────────────────
        let vertex_capacity = INITIAL_GLYPH_CAPACITY as u64 * VERTEX_BYTES_PER_GLYPH;
        let index_capacity = INITIAL_GLYPH_CAPACITY as u64 * INDEX_BYTES_PER_GLYPH;
        let vertex_buffer = create_vertex_buffer(device, vertex_capacity);
        let index_buffer = create_index_buffer(device, index_capacity);

        // ── Uniform buffer ──────────────────────────────────────
        let uniform_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("glint_text_ub"),
            size: std::mem::size_of::<TextUniforms>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("glint_text_uniform_bg"),
            layout: &uniform_bgl,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // ── Atlas texture (initially blank) ─────────────────────
        let atlas_texture = create_atlas_texture(device, atlas_size);
        let atlas_bind_group = create_atlas_bind_group(device, &atlas_bgl, &atlas_texture);

        Self {
            pipeline,
            vertex_buffer,
            vertex_capacity,
            index_buffer,
            index_capacity,
            draw_count: 0,
            uniform_buffer,
            uniform_bind_group,
            atlas_texture,
            atlas_bind_group,
            atlas_bgl,
            atlas_size,
        }
    }

    // ───────────────────── Upload ─────────────────────────────────

    /// Upload a laid-out mesh, regrowing the GPU buffers when needed.
    ///
    /// `draw_count` is the caller's requested index count (the text
    /// object's visible-rune clamp); it is clamped again to the mesh's
    /// actual index count.
    pub fn upload_mesh(
        &mut self,
        device: &Device,
        queue: &Queue,
        mesh: &TextMesh,
        draw_count: u32,
    ) {
        let vertex_bytes = mesh.vertex_bytes();
        let index_bytes = mesh.index_bytes();

        if vertex_bytes.len() as u64 > self.vertex_capacity {
            self.vertex_capacity = (vertex_bytes.len() as u64).next_power_of_two();
            debug!("regrowing text vertex buffer to {} bytes", self.vertex_capacity);
            self.vertex_buffer = create_vertex_buffer(device, self.vertex_capacity);
        }
        if index_bytes.len() as u64 > self.index_capacity {
            self.index_capacity = (index_bytes.len() as u64).next_power_of_two();
            debug!("regrowing text index buffer to {} bytes", self.index_capacity);
            self.index_buffer = create_index_buffer(device, self.index_capacity);
        }

        if !mesh.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
            queue.write_buffer(&self.index_buffer, 0, index_bytes);
        }

        self.draw_count = draw_count.min(mesh.indices.len() as u32);
    }

    /// Upload the per-text uniform block for this frame.
    pub fn upload_uniforms(&self, queue: &Queue, uniforms: &TextUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Upload the full atlas texture data (RGBA, `size × size`).
    ///
    /// Recreates the texture when the size changed.
    pub fn upload_atlas(&mut self, device: &Device, queue: &Queue, data: &[u8], size: u32) {
        if size != self.atlas_size {
            self.atlas_size = size;
            self.atlas_texture = create_atlas_texture(device, size);
            self.atlas_bind_group =
                create_atlas_bind_group(device, &self.atlas_bgl, &self.atlas_texture);
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.atlas_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size * 4), // RGBA = 4 bytes per pixel
                rows_per_image: Some(size),
            },
            Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );
    }

    // ───────────────────── Draw ───────────────────────────────────

    /// Record the indexed draw into the render pass.
    pub fn draw<'a>(&'a self, pass: &mut RenderPass<'a>) {
        if self.draw_count == 0 {
            return;
        }

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        pass.set_bind_group(1, &self.atlas_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), IndexFormat::Uint32);
        pass.draw_indexed(0..self.draw_count, 0, 0..1);
    }

    /// Indices the next draw call will issue.
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }
}
