//! Browser bindings
//!
//! The page owns the canvas, input listeners and `requestAnimationFrame`.
//! It forwards timestamps and events here and draws the JSON snapshot it
//! gets back.

use wasm_bindgen::prelude::*;

use crate::persistence::LocalStorageStore;
use crate::platform::{InputEvent, command_for};
use crate::sim::{Game, Viewport};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Gate Runner (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStorageStore>,
    viewport: Viewport,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let seed = js_sys::Date::now() as u64;
        WebGame {
            game: Game::new(LocalStorageStore, Tuning::default(), seed),
            viewport: Viewport::new(width, height),
        }
    }

    /// Container resized; applies from the next session
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn start(&mut self, now_ms: f64) {
        self.game.start(now_ms, &self.viewport);
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        self.game.toggle_pause(now_ms);
    }

    pub fn flap(&mut self) {
        self.game.flap();
    }

    /// Keyboard `code` from a keydown event
    pub fn key(&mut self, code: &str, now_ms: f64) {
        if let Some(command) = command_for(InputEvent::Key(code)) {
            self.game.handle(command, now_ms, &self.viewport);
        }
    }

    /// Advance one frame and return the snapshot as JSON
    pub fn tick(&mut self, now_ms: f64) -> String {
        let snapshot = self.game.tick(now_ms, false);
        serde_json::to_string(&snapshot).unwrap_or_default()
    }

    pub fn best_score(&self) -> u32 {
        self.game.scores().best()
    }
}
