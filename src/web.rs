//! Browser binding
//!
//! The JS presentation layer owns the canvas, audio and DOM. It forwards key
//! state and frame deltas here and reads back snapshots and events as JSON.

use wasm_bindgen::prelude::*;

use crate::besttimes::BestTimes;
use crate::game::Game;
use crate::sim::{Level, SimEvent};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialised".into());
    }
    log::info!("Marble Rush starting...");
}

#[wasm_bindgen]
pub struct WasmGame {
    game: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Load `level_json`, or the built-in demo level when absent
    #[wasm_bindgen(constructor)]
    pub fn new(level_json: Option<String>) -> Result<WasmGame, JsValue> {
        let level = match level_json {
            Some(json) => Level::from_json(&json).map_err(|err| {
                log::warn!("Rejected level document: {}", err);
                JsValue::from_str(&err.to_string())
            })?,
            None => Level::demo(),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        Ok(Self {
            game: Game::new(level, Tuning::load(), BestTimes::load(), seed),
        })
    }

    pub fn set_input(&mut self, left: bool, right: bool, jump: bool) {
        self.game.input.left = left;
        self.game.input.right = right;
        self.game.input.jump = jump;
    }

    /// Advance by a frame delta in seconds; returns this frame's events as JSON
    pub fn update(&mut self, dt: f32) -> String {
        let events = self.game.update(dt);
        let finished = events
            .iter()
            .any(|e| matches!(e, SimEvent::GoalReached { .. }));
        if finished && self.game.new_record {
            self.game.best_times.save();
        }
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Current drawable state as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.game.state.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// Best time in ms (0 when no record)
    pub fn best_time(&self) -> f64 {
        self.game.best_time()
    }

    pub fn best_time_label(&self) -> String {
        crate::format_time(self.game.best_time())
    }

    pub fn new_record(&self) -> bool {
        self.game.new_record
    }
}
