use tracing::Level;
use tracing_wasm::WASMLayerConfigBuilder;

/// Routes panics and `tracing` events to the browser console.
pub fn initialise(level: Level) {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .set_report_logs_in_timings(false)
            .build(),
    );
}
