//! GPU context — owns `wgpu::Device`, `Queue`, and optional `Surface`.
//!
//! `new_headless` is for tests and off-screen rendering; `new_with_surface`
//! attaches a swapchain to a `raw_window_handle`-compatible window. Both
//! paths share one adapter/device request.

use thiserror::Error;
use wgpu::{
    Adapter, Device, DeviceDescriptor, Instance, InstanceDescriptor, Queue,
    RequestAdapterOptions, Surface, SurfaceCapabilities, SurfaceConfiguration,
    TextureFormat, TextureUsages,
};

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("no compatible GPU adapter")]
    AdapterUnavailable,
    #[error("device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),
}

/// Core GPU state the text renderer draws through.
pub struct GpuContext {
    pub device: Device,
    pub queue: Queue,
    /// Present only when rendering to a window.
    pub surface: Option<Surface<'static>>,
    pub surface_config: Option<SurfaceConfiguration>,
    pub surface_format: TextureFormat,
}

async fn request_device(
    instance: &Instance,
    compatible_surface: Option<&Surface<'static>>,
    label: &str,
) -> Result<(Adapter, Device, Queue), GpuError> {
    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuError::AdapterUnavailable)?;

    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some(label),
                ..Default::default()
            },
            None,
        )
        .await?;

    Ok((adapter, device, queue))
}

/// Prefer an sRGB swapchain format; fall back to whatever the surface
/// offers first.
fn pick_surface_format(caps: &SurfaceCapabilities) -> TextureFormat {
    caps.formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .unwrap_or(caps.formats[0])
}

fn swapchain_config(
    caps: &SurfaceCapabilities,
    format: TextureFormat,
    width: u32,
    height: u32,
) -> SurfaceConfiguration {
    SurfaceConfiguration {
        usage: TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        // Fifo (vsync) is the only mode every backend guarantees.
        present_mode: wgpu::PresentMode::Fifo,
        desired_maximum_frame_latency: 2,
        alpha_mode: caps.alpha_modes[0],
        view_formats: vec![],
    }
}

impl GpuContext {
    /// Create a headless context (no window, no surface).
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor::default());
        let (_adapter, device, queue) = request_device(&instance, None, "glint-headless").await?;

        Ok(Self {
            device,
            queue,
            surface: None,
            surface_config: None,
            // Off-screen targets are created by the caller; default to the
            // most widely supported format.
            surface_format: TextureFormat::Bgra8UnormSrgb,
        })
    }

    /// Create a context with a surface attached to `window`.
    ///
    /// `width`/`height` are the initial surface size in pixels and should
    /// match the window size the font provider was configured with, so NDC
    /// positioning lines up.
    pub async fn new_with_surface<W>(window: W, width: u32, height: u32) -> Result<Self, GpuError>
    where
        W: wgpu::WasmNotSendSync + Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = Instance::new(&InstanceDescriptor::default());

        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::SurfaceCreation(e.to_string()))?;

        let (adapter, device, queue) =
            request_device(&instance, Some(&surface), "glint-windowed").await?;

        let caps = surface.get_capabilities(&adapter);
        let format = pick_surface_format(&caps);
        let config = swapchain_config(&caps, format, width, height);
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            surface_config: Some(config),
            surface_format: format,
        })
    }

    /// Whether this context renders off-screen only.
    pub fn is_headless(&self) -> bool {
        self.surface.is_none()
    }

    /// Reconfigure the surface after a window resize.
    ///
    /// Zero-sized requests (minimized windows) are ignored, as is the call
    /// itself on a headless context.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let Some(config) = self.surface_config.as_mut() else {
            return;
        };
        config.width = width;
        config.height = height;
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, config);
        }
    }

    /// Current surface dimensions; `(0, 0)` when headless.
    pub fn surface_size(&self) -> (u32, u32) {
        match &self.surface_config {
            Some(config) => (config.width, config.height),
            None => (0, 0),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
