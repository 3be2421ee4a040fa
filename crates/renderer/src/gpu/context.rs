use tracing::{debug, error, info, warn};

use crate::error::InitError;
use crate::surface::ViewportSink;

/// wgpu instance/device/surface wiring for the canvas.
///
/// The surface stays unconfigured until the first non-empty
/// [`ViewportSink::resize_viewport`] call.
pub struct GpuContext {
    _instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    configured: bool,
    viewport: (u32, u32),
    max_dimension: u32,
}

impl GpuContext {
    /// Acquires a WebGL2-backed device for `target`.
    pub async fn new(target: wgpu::SurfaceTarget<'static>) -> Result<Self, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::GL,
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance
            .create_surface(target)
            .map_err(|err| InitError::ContextUnavailable(err.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| InitError::ContextUnavailable(err.to_string()))?;

        let info = adapter.get_info();
        let limits = adapter.limits();
        debug!(
            name = %info.name,
            backend = ?info.backend,
            device_type = ?info.device_type,
            driver = %info.driver,
            "selected GPU adapter"
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pulsar device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(limits.clone()),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::default(),
            })
            .await
            .map_err(|err| InitError::Device(err.to_string()))?;

        device.on_uncaptured_error(Box::new(|err| {
            error!(error = %err, "uncaptured GPU error");
        }));

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| {
                InitError::ContextUnavailable("surface reports no supported formats".to_string())
            })?;
        if format.is_srgb() {
            warn!(?format, "no linear surface format available; colours will be sRGB-encoded");
        }

        let present_mode = wgpu::PresentMode::Fifo;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: 1,
            height: 1,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        info!(adapter = %info.name, ?format, ?present_mode, "GPU context ready");

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            configured: false,
            viewport: (0, 0),
            max_dimension: limits.max_texture_dimension_2d,
        })
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Viewport rectangle applied to every render pass.
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub(crate) fn is_drawable(&self) -> bool {
        self.configured && self.viewport != (0, 0)
    }

    pub(crate) fn current_texture(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Re-applies the current configuration after a lost or outdated surface.
    pub(crate) fn reconfigure(&mut self) {
        if self.configured {
            self.surface.configure(&self.device, &self.config);
        }
    }
}

impl ViewportSink for GpuContext {
    fn resize_viewport(&mut self, width: u32, height: u32) {
        if width > self.max_dimension || height > self.max_dimension {
            warn!(
                width,
                height,
                max_dimension = self.max_dimension,
                "backing store exceeds GPU texture limit; clamping"
            );
        }

        let Some((width, height)) = effective_viewport(width, height, self.max_dimension) else {
            debug!("zero-area surface; frames are skipped until it grows");
            self.viewport = (0, 0);
            return;
        };

        self.viewport = (width, height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.configured = true;
    }
}

/// Size the surface is configured with for a backing store of
/// `width` x `height`: each side clamped to `max_dimension`, or `None` when
/// there is nothing to draw into.
pub(crate) fn effective_viewport(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    let clamped = (width.min(max_dimension), height.min(max_dimension));
    (clamped.0 > 0 && clamped.1 > 0).then_some(clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEBGL2_MAX: u32 = 2048;

    #[test]
    fn viewport_within_limit_is_unchanged() {
        assert_eq!(effective_viewport(1600, 1200, WEBGL2_MAX), Some((1600, 1200)));
        assert_eq!(effective_viewport(WEBGL2_MAX, 1, WEBGL2_MAX), Some((WEBGL2_MAX, 1)));
    }

    #[test]
    fn oversize_viewport_is_clamped_per_axis() {
        assert_eq!(effective_viewport(5120, 1440, WEBGL2_MAX), Some((WEBGL2_MAX, 1440)));
        assert_eq!(effective_viewport(4096, 4096, WEBGL2_MAX), Some((WEBGL2_MAX, WEBGL2_MAX)));
    }

    #[test]
    fn zero_area_viewport_is_not_drawable() {
        assert_eq!(effective_viewport(0, 720, WEBGL2_MAX), None);
        assert_eq!(effective_viewport(1280, 0, WEBGL2_MAX), None);
        assert_eq!(effective_viewport(0, 0, WEBGL2_MAX), None);
    }
}
