//! Backing-store sizing for the drawable surface.
//!
//! The manager never accumulates: every call recomputes [`SurfaceState`] from a
//! fresh [`Viewport`] reading and pushes the result to both the drawable
//! element and the GPU viewport.

use tracing::debug;

use crate::types::{SurfaceState, Viewport, MAX_PIXEL_RATIO};

/// Drawable element whose pixel buffer and display size can be set.
pub trait CanvasSizing {
    /// Sets the pixel-buffer resolution.
    fn set_backing_size(&mut self, width: u32, height: u32);
    /// Sets the displayed (CSS) size in logical pixels.
    fn set_display_size(&mut self, width: f64, height: f64);
}

/// GPU-side consumer of the backing-store resolution.
pub trait ViewportSink {
    fn resize_viewport(&mut self, width: u32, height: u32);
}

#[derive(Debug, Clone)]
pub struct SurfaceManager {
    state: SurfaceState,
    max_pixel_ratio: f64,
}

impl SurfaceManager {
    pub fn new(max_pixel_ratio: f64) -> Self {
        Self {
            state: SurfaceState::default(),
            max_pixel_ratio,
        }
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Applies a viewport reading to the canvas and the GPU viewport.
    ///
    /// Safe to call before any shader exists; the sink only needs a configured
    /// GPU context.
    pub fn update_size<C, V>(&mut self, viewport: Viewport, canvas: &mut C, sink: &mut V) -> SurfaceState
    where
        C: CanvasSizing + ?Sized,
        V: ViewportSink + ?Sized,
    {
        let state = SurfaceState::from_viewport(viewport, self.max_pixel_ratio);
        self.state = state;

        canvas.set_backing_size(state.backing_width, state.backing_height);
        canvas.set_display_size(state.logical_width, state.logical_height);
        sink.resize_viewport(state.backing_width, state.backing_height);

        debug!(
            logical_width = state.logical_width,
            logical_height = state.logical_height,
            pixel_ratio = state.pixel_ratio,
            backing_width = state.backing_width,
            backing_height = state.backing_height,
            "updated surface size"
        );
        state
    }
}

impl Default for SurfaceManager {
    fn default() -> Self {
        Self::new(MAX_PIXEL_RATIO)
    }
}
