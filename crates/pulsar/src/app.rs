use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use renderer::gpu::{init_shaders, GpuContext, GpuState};
use renderer::{AnimationDriver, FrameScheduler, RendererConfig, SurfaceManager, Viewport};
use tracing::{error, info};
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::options::LaunchOptions;
use crate::web::{self, AnimationFrames, CanvasElement};

/// The single application context shared by the resize and frame callbacks.
pub struct App {
    canvas: CanvasElement,
    surface: SurfaceManager,
    driver: AnimationDriver<GpuState>,
}

impl App {
    pub fn update_size(&mut self, viewport: Viewport) {
        self.surface
            .update_size(viewport, &mut self.canvas, self.driver.target_mut());
    }

    /// Runs one frame. A fatal frame error is logged and the loop is not
    /// re-armed.
    pub fn render(&mut self, timestamp_ms: f64, frames: &mut AnimationFrames) {
        if let Err(err) = self.driver.render(timestamp_ms, frames) {
            error!(error = %err, "animation loop stopped");
        }
    }
}

/// Creates the canvas, acquires the GPU, builds the pipeline and starts the
/// loop. Any error here is fatal.
pub async fn launch(options: LaunchOptions) -> Result<()> {
    let config = RendererConfig::default();
    let window = web::window()?;
    let document = web::document(&window)?;

    let canvas = web::create_canvas(&document)?;
    let mut context = GpuContext::new(wgpu::SurfaceTarget::Canvas(canvas.clone()))
        .await
        .context("failed to acquire a WebGL2 context")?;
    web::attach(&document, &canvas)?;

    let mut canvas = CanvasElement::new(canvas);
    let mut surface = SurfaceManager::new(config.max_pixel_ratio);
    surface.update_size(web::read_viewport(&window), &mut canvas, &mut context);

    let pipeline = init_shaders(&context).context("failed to initialise shaders")?;
    let state = GpuState::new(context, pipeline);
    let time_uniform = state.time_slot();
    let driver = AnimationDriver::new(state, time_uniform).with_fps_logging(options.log_fps);

    let app = Rc::new(RefCell::new(App {
        canvas,
        surface,
        driver,
    }));

    listen_for_resize(&window, Rc::clone(&app))?;
    start_animation(window, app)?;
    info!("animation started");
    Ok(())
}

fn listen_for_resize(window: &Window, app: Rc<RefCell<App>>) -> Result<()> {
    let source = window.clone();
    web::on_resize(window, move || {
        app.borrow_mut().update_size(web::read_viewport(&source));
    })
}

fn start_animation(window: Window, app: Rc<RefCell<App>>) -> Result<()> {
    let frames = AnimationFrames::new(window);
    let mut scheduler = frames.clone();
    frames.install(Closure::new(move |timestamp_ms: f64| {
        app.borrow_mut().render(timestamp_ms, &mut scheduler);
    }));

    let mut kickoff = frames;
    kickoff
        .request_frame()
        .context("failed to schedule the first frame")
}
