use crate::compile::UniformSlot;
use crate::error::FrameError;
use crate::runtime::{FrameStatus, FrameTarget};
use crate::surface::ViewportSink;

use super::context::GpuContext;
use super::geometry::QUAD_VERTEX_COUNT;
use super::pipeline::ShaderPipeline;

/// GPU context plus the initialised pipeline; the draw target of the loop.
pub struct GpuState {
    context: GpuContext,
    pipeline: ShaderPipeline,
}

impl GpuState {
    pub fn new(context: GpuContext, pipeline: ShaderPipeline) -> Self {
        Self { context, pipeline }
    }

    pub fn time_slot(&self) -> Option<UniformSlot> {
        self.pipeline.time_slot()
    }

    fn encode_and_present(&self, frame: wgpu::SurfaceTexture) {
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        {
            let (width, height) = self.context.viewport();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("radial pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            render_pass.set_pipeline(&self.pipeline.pipeline);
            if let Some(uniform) = &self.pipeline.time_uniform {
                for (index, group) in uniform.leading_groups.iter().enumerate() {
                    render_pass.set_bind_group(index as u32, group, &[]);
                }
                render_pass.set_bind_group(uniform.slot().group, &uniform.bind_group, &[]);
            }
            render_pass.set_vertex_buffer(0, self.pipeline.vertex_buffer.slice(..));
            render_pass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        }
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

impl FrameTarget for GpuState {
    fn write_time(&mut self, slot: UniformSlot, seconds: f32) {
        if let Some(uniform) = &self.pipeline.time_uniform {
            uniform.write(&self.context.queue, slot, seconds);
        }
    }

    fn draw_quad(&mut self) -> Result<FrameStatus, FrameError> {
        if !self.context.is_drawable() {
            return Ok(FrameStatus::Skipped);
        }

        match self.context.current_texture() {
            Ok(frame) => {
                self.encode_and_present(frame);
                Ok(FrameStatus::Presented)
            }
            Err(err) => {
                let status = surface_error_status(err)?;
                if status == FrameStatus::Recovered {
                    self.context.reconfigure();
                }
                Ok(status)
            }
        }
    }
}

/// Outcome of a frame whose surface texture could not be acquired.
///
/// `Recovered` asks the caller to reconfigure the surface; errors are fatal
/// and end the loop.
pub(crate) fn surface_error_status(err: wgpu::SurfaceError) -> Result<FrameStatus, FrameError> {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => Ok(FrameStatus::Recovered),
        wgpu::SurfaceError::Timeout => Ok(FrameStatus::Skipped),
        err => Err(FrameError::Surface(err)),
    }
}

impl ViewportSink for GpuState {
    fn resize_viewport(&mut self, width: u32, height: u32) {
        self.context.resize_viewport(width, height);
    }
}
