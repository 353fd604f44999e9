//! Dolphin Jumper core crate.
//!
//! A small canvas arcade game: a dolphin jumps over drifting ice while a
//! scoring and high-score system tracks progress. `start_game()` is the JS
//! entrypoint; the simulation logic under [`game::sim`] is plain Rust so the
//! native test suite can drive whole rounds without a browser.

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Build the canvas, wire input, start asset loading and the frame loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start()
}
