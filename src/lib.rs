//! Untrusted core crate.
//!
//! A 50x25 tile puzzle where each level is a small Rhai script the player can
//! partially rewrite. The game logic (`game`, `map`, `player`, `script`) is
//! plain Rust and runs natively; `web` wires it to a canvas and a code panel.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod display;
pub mod editor;
pub mod error;
pub mod game;
pub mod level;
mod logger;
pub mod map;
pub mod objects;
pub mod player;
pub mod script;
mod web;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::{Game, GameEvent};
pub use web::start_game_with_config;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Start with the stock configuration.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    start_game_with_config("")
}
