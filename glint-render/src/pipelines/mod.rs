//! wgpu render pipelines.

pub mod outline;
pub mod text;
