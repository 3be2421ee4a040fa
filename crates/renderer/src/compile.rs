//! GLSL compilation and program linking on top of naga.
//!
//! `create_shader` parses and validates one stage; `create_program` checks the
//! pair the way a GL linker would (stage kinds, entry points, varyings) before
//! the modules are handed to wgpu. Failures log the diagnostic text and come
//! back as [`ShaderError`] instead of a null handle.

use thiserror::Error;
use tracing::{debug, error};
use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::{self, AddressSpace, Binding, Handle, ShaderStage, Type, TypeInner};

use crate::types::ShaderKind;

/// Entry point name produced by the GLSL front end.
pub const ENTRY_POINT: &str = "main";

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderKind, log: String },
    #[error("program failed to link:\n{log}")]
    Link { log: String },
}

impl ShaderError {
    /// Compiler or linker diagnostic text.
    pub fn log(&self) -> &str {
        match self {
            ShaderError::Compile { log, .. } | ShaderError::Link { log } => log,
        }
    }
}

/// A parsed and validated shader stage.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    kind: ShaderKind,
    module: naga::Module,
}

impl CompiledShader {
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn module(&self) -> &naga::Module {
        &self.module
    }
}

/// Location of a uniform inside a bound uniform block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot {
    pub group: u32,
    pub binding: u32,
    /// Byte offset of the member inside its block.
    pub offset: u32,
    /// Size of the whole block in bytes.
    pub block_size: u32,
}

/// A linked vertex + fragment pair.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    vertex: CompiledShader,
    fragment: CompiledShader,
}

impl ShaderProgram {
    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    /// Resolves a uniform by name, searching block members first and loose
    /// uniforms second. `None` when neither stage declares it.
    pub fn uniform_slot(&self, name: &str) -> Option<UniformSlot> {
        [&self.vertex, &self.fragment]
            .into_iter()
            .find_map(|shader| find_uniform(&shader.module, name))
    }

    /// Resolves the location of a vertex-stage input by name.
    pub fn attribute_location(&self, name: &str) -> Option<u32> {
        let entry = entry_point(&self.vertex.module, ShaderStage::Vertex)?;
        entry
            .function
            .arguments
            .iter()
            .find(|argument| argument.name.as_deref() == Some(name))
            .and_then(|argument| match &argument.binding {
                Some(Binding::Location { location, .. }) => Some(*location),
                _ => None,
            })
    }
}

/// Parses and validates `source` as a GLSL 450 shader of the given kind.
pub fn create_shader(kind: ShaderKind, source: &str) -> Result<CompiledShader, ShaderError> {
    let options = Options::from(naga_stage(kind));
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| compile_failure(kind, errors.emit_to_string(source)))?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::empty());
    validator
        .validate(&module)
        .map_err(|err| compile_failure(kind, err.emit_to_string(source)))?;

    debug!(stage = %kind, "compiled shader");
    Ok(CompiledShader { kind, module })
}

/// Links a vertex and fragment shader into a program.
pub fn create_program(
    vertex: CompiledShader,
    fragment: CompiledShader,
) -> Result<ShaderProgram, ShaderError> {
    if let Err(log) = check_link(&vertex, &fragment) {
        error!(log = %log, "program link error");
        return Err(ShaderError::Link { log });
    }
    debug!("linked shader program");
    Ok(ShaderProgram { vertex, fragment })
}

fn compile_failure(kind: ShaderKind, log: String) -> ShaderError {
    error!(stage = %kind, log = %log, "shader compile error");
    ShaderError::Compile { stage: kind, log }
}

fn naga_stage(kind: ShaderKind) -> ShaderStage {
    match kind {
        ShaderKind::Vertex => ShaderStage::Vertex,
        ShaderKind::Fragment => ShaderStage::Fragment,
    }
}

fn check_link(vertex: &CompiledShader, fragment: &CompiledShader) -> Result<(), String> {
    if vertex.kind != ShaderKind::Vertex {
        return Err(format!("expected a vertex shader, got a {} shader", vertex.kind));
    }
    if fragment.kind != ShaderKind::Fragment {
        return Err(format!(
            "expected a fragment shader, got a {} shader",
            fragment.kind
        ));
    }

    let vertex_entry = entry_point(&vertex.module, ShaderStage::Vertex)
        .ok_or_else(|| format!("vertex shader has no `{ENTRY_POINT}` entry point"))?;
    let fragment_entry = entry_point(&fragment.module, ShaderStage::Fragment)
        .ok_or_else(|| format!("fragment shader has no `{ENTRY_POINT}` entry point"))?;

    let outputs = vertex_entry
        .function
        .result
        .as_ref()
        .map(|result| location_slots(&vertex.module, result.ty, result.binding.as_ref(), None))
        .unwrap_or_default();

    let mut problems = Vec::new();
    for argument in &fragment_entry.function.arguments {
        let inputs = location_slots(
            &fragment.module,
            argument.ty,
            argument.binding.as_ref(),
            argument.name.as_deref(),
        );
        for input in inputs {
            match outputs.iter().find(|output| output.location == input.location) {
                None => problems.push(format!(
                    "fragment input `{}` at location {} is not written by the vertex shader",
                    input.name, input.location
                )),
                Some(output) => {
                    let written = &vertex.module.types[output.ty].inner;
                    let read = &fragment.module.types[input.ty].inner;
                    if written != read {
                        problems.push(format!(
                            "varying at location {} is `{}` in the vertex shader but `{}` in the fragment shader",
                            input.location, output.name, input.name
                        ));
                    }
                }
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}

fn entry_point(module: &naga::Module, stage: ShaderStage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|entry| entry.name == ENTRY_POINT && entry.stage == stage)
}

struct LocationSlot {
    location: u32,
    ty: Handle<Type>,
    name: String,
}

/// Flattens a stage argument or result into its user-defined `location` slots.
fn location_slots(
    module: &naga::Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    name: Option<&str>,
) -> Vec<LocationSlot> {
    match binding {
        Some(Binding::Location { location, .. }) => vec![LocationSlot {
            location: *location,
            ty,
            name: name.unwrap_or("<unnamed>").to_string(),
        }],
        Some(Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .filter_map(|member| match &member.binding {
                    Some(Binding::Location { location, .. }) => Some(LocationSlot {
                        location: *location,
                        ty: member.ty,
                        name: member.name.clone().unwrap_or_else(|| "<unnamed>".to_string()),
                    }),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        },
    }
}

fn find_uniform(module: &naga::Module, name: &str) -> Option<UniformSlot> {
    module.global_variables.iter().find_map(|(_, variable)| {
        if !matches!(variable.space, AddressSpace::Uniform) {
            return None;
        }
        let binding = variable.binding.as_ref()?;
        match &module.types[variable.ty].inner {
            TypeInner::Struct { members, span } => members
                .iter()
                .find(|member| member.name.as_deref() == Some(name))
                .map(|member| UniformSlot {
                    group: binding.group,
                    binding: binding.binding,
                    offset: member.offset,
                    block_size: *span,
                }),
            inner if variable.name.as_deref() == Some(name) => Some(UniformSlot {
                group: binding.group,
                binding: binding.binding,
                offset: 0,
                block_size: inner.size(module.to_ctx()),
            }),
            _ => None,
        }
    })
}
