//! DOM plumbing: canvas element, viewport readings, resize events and the
//! `requestAnimationFrame` scheduler.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use renderer::{CanvasSizing, FrameError, FrameScheduler, Viewport};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

pub type FrameCallback = Closure<dyn FnMut(f64)>;

pub fn window() -> Result<Window> {
    web_sys::window().context("no global `window`")
}

pub fn document(window: &Window) -> Result<Document> {
    window.document().context("window has no document")
}

/// Query string of the current page, empty when unavailable.
pub fn page_query() -> String {
    web_sys::window()
        .and_then(|window| window.location().search().ok())
        .unwrap_or_default()
}

pub fn create_canvas(document: &Document) -> Result<HtmlCanvasElement> {
    document
        .create_element("canvas")
        .map_err(|err| anyhow!("failed to create canvas: {err:?}"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| anyhow!("created element is not a canvas"))
}

pub fn attach(document: &Document, canvas: &HtmlCanvasElement) -> Result<()> {
    document
        .body()
        .context("document has no body")?
        .append_child(canvas)
        .map_err(|err| anyhow!("failed to append canvas: {err:?}"))?;
    Ok(())
}

/// Reads inner size and device pixel ratio. Missing values read as zero; the
/// sizing code handles empty viewports.
pub fn read_viewport(window: &Window) -> Viewport {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    Viewport::new(width, height, window.device_pixel_ratio())
}

/// The page canvas as seen by the surface manager.
pub struct CanvasElement {
    canvas: HtmlCanvasElement,
}

impl CanvasElement {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas }
    }
}

impl CanvasSizing for CanvasElement {
    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        let style = self.canvas.style();
        for (property, value) in [("width", width), ("height", height)] {
            if let Err(err) = style.set_property(property, &format!("{value}px")) {
                warn!(property, error = ?err, "failed to set canvas display size");
            }
        }
    }
}

/// Calls `on_resize` for every `resize` event on `window`. The listener lives
/// for the rest of the page.
pub fn on_resize<F>(window: &Window, mut on_resize: F) -> Result<()>
where
    F: FnMut() + 'static,
{
    let listener = Closure::<dyn FnMut()>::new(move || on_resize());
    window
        .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        .map_err(|err| anyhow!("failed to add resize listener: {err:?}"))?;
    listener.forget();
    Ok(())
}

/// `requestAnimationFrame` bound to one self-re-arming callback.
#[derive(Clone)]
pub struct AnimationFrames {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    /// Installs the frame callback. Replacing it drops the previous closure.
    pub fn install(&self, callback: FrameCallback) {
        *self.callback.borrow_mut() = Some(callback);
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&mut self) -> Result<(), FrameError> {
        let callback = self.callback.borrow();
        let callback = callback
            .as_ref()
            .ok_or_else(|| FrameError::Schedule("no frame callback installed".to_string()))?;
        self.window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map(|_| ())
            .map_err(|err| FrameError::Schedule(format!("{err:?}")))
    }
}
