//! Pulsar: a pulsing radial ring drawn into a full-page WebGL2 canvas.
//!
//! Loading the module runs [`start`], which installs logging, then awaits the
//! launch (GPU acquisition is async in the browser). A launch failure is
//! logged and returned to JavaScript as a rejected promise; nothing is
//! rendered.

mod options;

pub use options::{LaunchOptions, DEFAULT_LOG_LEVEL};

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() -> Result<(), wasm_bindgen::JsValue> {
    let options = LaunchOptions::from_query(&web::page_query());
    logging::initialise(options.log_level);
    for ignored in &options.ignored {
        tracing::debug!(option = %ignored, "ignoring unrecognised launch option");
    }
    tracing::info!(level = %options.log_level, fps = options.log_fps, "starting pulsar");

    app::launch(options).await.map_err(|err| {
        tracing::error!(error = ?err, "start-up failed");
        wasm_bindgen::JsValue::from_str(&startup_failure_message(&err))
    })
}

/// Text of the rejection handed back to the page: the whole context chain on
/// one line.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn startup_failure_message(err: &anyhow::Error) -> String {
    format!("{err:#}")
}
