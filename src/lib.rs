// cargo: dep = "yew"
// cargo: dep = "serde"
// cargo: dep = "serde_json"
// cargo: dep = "reqwest"
// cargo: dep = "futures-util"
// cargo: dep = "wasm-bindgen"
// cargo: dep = "wasm-bindgen-futures"
// cargo: dep = "web-sys"
// cargo: dep = "uuid"
// cargo: dep = "js-sys"
// cargo: dep = "anyhow"
// cargo: dep = "thiserror"
// cargo: dep = "console_error_panic_hook"
// cargo: dep = "log"
// cargo: dep = "wasm-logger"
// cargo: dep = "gloo-timers"
// cargo: dep = "chrono"
// cargo: dep = "regex"

pub mod app;
pub mod components;
pub mod errors;
pub mod markdown;
pub mod models;
pub mod services;
pub mod utils;
pub mod worker;

use wasm_bindgen::prelude::*;
use app::App;

/// Runs on module load in both the side panel and the background worker.
#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
    utils::init_logging();
    log::info!("sidepanel-assistant wasm initialized");
}

/// Mount the side panel. Called from the panel page's loader script.
#[wasm_bindgen]
pub fn run_app() {
    yew::Renderer::<App>::new().render();
}
