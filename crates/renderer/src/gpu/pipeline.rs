use std::borrow::Cow;

use tracing::{debug, info};

use crate::compile::{create_program, create_shader, ShaderError, ShaderProgram, UniformSlot, ENTRY_POINT};
use crate::error::InitError;
use crate::pattern::{FRAGMENT_SHADER_GLSL, POSITION_ATTRIBUTE, TIME_UNIFORM, VERTEX_SHADER_GLSL};
use crate::types::ShaderKind;

use super::context::GpuContext;
use super::geometry::{position_attribute, upload_quad, QUAD_STRIDE};
use super::uniforms::TimeUniform;

/// The activated program plus the resources it draws with.
pub struct ShaderPipeline {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) time_uniform: Option<TimeUniform>,
}

impl ShaderPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        program: &ShaderProgram,
    ) -> Result<Self, InitError> {
        let location = program
            .attribute_location(POSITION_ATTRIBUTE)
            .ok_or_else(|| InitError::MissingAttribute(POSITION_ATTRIBUTE.to_string()))?;

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("radial vertex"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.vertex().module().clone())),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("radial fragment"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.fragment().module().clone())),
        });

        let (time_uniform, bind_group_layouts) = match program.uniform_slot(TIME_UNIFORM) {
            Some(slot) => {
                let (uniform, layouts) = TimeUniform::new(device, slot);
                (Some(uniform), layouts)
            }
            None => (None, Vec::new()),
        };
        let layout_refs: Vec<&wgpu::BindGroupLayout> = bind_group_layouts.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("radial pipeline layout"),
            bind_group_layouts: &layout_refs,
            push_constant_ranges: &[],
        });

        let attributes = [position_attribute(location)];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("radial pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(ENTRY_POINT),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: QUAD_STRIDE,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(ENTRY_POINT),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = upload_quad(device);
        debug!(
            position_location = location,
            time_uniform = time_uniform.is_some(),
            "radial pipeline ready"
        );

        Ok(Self {
            pipeline,
            vertex_buffer,
            time_uniform,
        })
    }

    /// Resolved time-uniform handle, if the program declares one.
    pub fn time_slot(&self) -> Option<UniformSlot> {
        self.time_uniform.as_ref().map(TimeUniform::slot)
    }
}

/// Compiles and links the fixed radial shaders.
///
/// Both stages are compiled before either failure is reported so the log
/// carries every diagnostic.
pub fn build_program() -> Result<ShaderProgram, ShaderError> {
    let vertex = create_shader(ShaderKind::Vertex, VERTEX_SHADER_GLSL);
    let fragment = create_shader(ShaderKind::Fragment, FRAGMENT_SHADER_GLSL);
    create_program(vertex?, fragment?)
}

/// Builds the ready-to-draw pipeline: program, quad upload, uniform lookup.
pub fn init_shaders(context: &GpuContext) -> Result<ShaderPipeline, InitError> {
    let program = build_program()?;
    let pipeline = ShaderPipeline::new(&context.device, context.surface_format(), &program)?;
    info!("shader pipeline initialised");
    Ok(pipeline)
}
