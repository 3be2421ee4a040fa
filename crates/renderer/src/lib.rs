//! Renderer crate for Pulsar, a full-viewport radial shader.
//!
//! The crate owns everything between the host page and the pixels:
//!
//! ```text
//!   host viewport ──▶ SurfaceManager::update_size ──▶ canvas + GPU viewport
//!
//!   pattern GLSL ──▶ compile::create_shader ──▶ compile::create_program
//!                                                   │ ShaderProgram
//!                                                   ▼
//!                              gpu::init_shaders ──▶ ShaderPipeline (quad, u_time)
//!                                                   │
//!   frame callback ──▶ AnimationDriver::render ──▶ GpuState::draw_quad ──▶ present
//!          ▲                                        │
//!          └────────── FrameScheduler::request_frame ◀┘
//! ```
//!
//! Host integration (DOM canvas, resize events, `requestAnimationFrame`) lives
//! behind the [`CanvasSizing`], [`ViewportSink`] and [`FrameScheduler`] traits so
//! that everything here builds and tests without a browser.

mod compile;
mod error;
pub mod gpu;
pub mod pattern;
mod runtime;
mod surface;
mod types;

pub use compile::{
    create_program, create_shader, CompiledShader, ShaderError, ShaderProgram, UniformSlot,
    ENTRY_POINT,
};
pub use error::{FrameError, InitError};
pub use runtime::{
    timestamp_seconds, AnimationDriver, FrameScheduler, FrameStats, FrameStatus, FrameTarget,
};
pub use surface::{CanvasSizing, SurfaceManager, ViewportSink};
pub use types::{
    RendererConfig, ShaderKind, SurfaceState, Viewport, MAX_PIXEL_RATIO,
};
