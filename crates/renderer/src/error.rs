use thiserror::Error;

use crate::compile::ShaderError;

/// Fatal start-up failures. Nothing can be rendered after any of these.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("WebGL2 context unavailable: {0}")]
    ContextUnavailable(String),
    #[error("failed to create GPU device: {0}")]
    Device(String),
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("vertex shader does not declare the `{0}` attribute")]
    MissingAttribute(String),
}

/// Per-frame failures that end the animation loop.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("surface error: {0}")]
    Surface(wgpu::SurfaceError),
    #[error("failed to schedule the next frame: {0}")]
    Schedule(String),
}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(value: wgpu::SurfaceError) -> Self {
        FrameError::Surface(value)
    }
}
