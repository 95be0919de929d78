//! # glint-render
//!
//! GPU rendering backend for `glint-text`, built on `wgpu`. This is the
//! "rendering context" side of the library: it accepts the vertex/index
//! data produced by the layout engine, uploads it, and issues the indexed
//! draw call.
//!
//! ## Architecture
//!
//! ```text
//!  Text (glint-text)
//!       │
//!       ▼
//!  TextUniforms::for_text()          ◀─── ortho × scale × position + color
//!       │
//!       ▼
//!  Renderer.prepare(gpu, &text)      ◀─── uploads mesh + uniforms + atlas
//!       │
//!       ▼
//!  Renderer.render_to_surface(gpu)   ◀─── clear + draw (+ debug outline)
//! ```
//!
//! ## Crate modules
//!
//! - [`context`] — GPU device/queue/surface initialisation
//! - [`vertex`] — vertex layout and uniform data types
//! - [`pipelines`] — wgpu render pipelines (text mesh, debug outline)
//! - [`renderer`] — high-level frame orchestration

pub mod context;
pub mod pipelines;
pub mod renderer;
pub mod vertex;

// Re-exports for convenience
pub use context::{GpuContext, GpuError};
pub use renderer::{FrameStats, RenderError, Renderer};
pub use vertex::{glyph_vertex_layout, TextUniforms};
