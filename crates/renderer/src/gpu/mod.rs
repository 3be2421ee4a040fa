//! wgpu side of the renderer.
//!
//! - `context` acquires the WebGL2-backed device for the canvas and owns the
//!   surface configuration, which doubles as the GPU viewport.
//! - `geometry` holds the clip-space quad and its vertex layout.
//! - `uniforms` owns the buffer behind the reflected time uniform.
//! - `pipeline` compiles the fixed shaders, links them and activates the result
//!   as a render pipeline.
//! - `state` glues context and pipeline together as the animation loop's draw
//!   target.

mod context;
mod geometry;
mod pipeline;
mod state;
mod uniforms;

pub use context::GpuContext;
pub use geometry::{QUAD_STRIDE, QUAD_VERTEX_COUNT, QUAD_VERTICES};
pub use pipeline::{build_program, init_shaders, ShaderPipeline};
pub use state::GpuState;
