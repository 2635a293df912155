//! Browser front-end (wasm-bindgen)

mod browser;

use wasm_bindgen::prelude::*;

pub use browser::{BrowserCalculator, PerformanceClock};

/// Module initializer: routes Rust panics to the browser console
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}
