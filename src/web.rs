//! Browser host bindings
//!
//! A thin handle for JavaScript: feed it frame times and taps, read back the
//! state and the event stream as JSON. Drawing and audio stay on the JS side.

use wasm_bindgen::prelude::*;

use crate::Tuning;
use crate::sim::{FixedStepper, GameState};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialised by an earlier module instance
        return;
    }
    log::info!("Mood Switch (web) loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    stepper: FixedStepper,
}

#[wasm_bindgen]
impl WebGame {
    /// New game for a screen of the given logical size
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, width: f32, height: f32) -> WebGame {
        WebGame {
            state: GameState::with_tuning(seed, Tuning::for_screen(width, height)),
            stepper: FixedStepper::default(),
        }
    }

    /// New game with JSON tuning overrides (bad JSON falls back to defaults)
    pub fn with_tuning_json(seed: u64, json: &str) -> WebGame {
        WebGame {
            state: GameState::with_tuning(seed, Tuning::load_or_default(Some(json))),
            stepper: FixedStepper::default(),
        }
    }

    pub fn tap(&mut self) {
        self.stepper.tap();
    }

    /// Advance by the frame's elapsed seconds; returns ticks run
    pub fn frame(&mut self, dt: f32) -> u32 {
        self.stepper.advance(&mut self.state, dt)
    }

    /// Drained events as a JSON array
    pub fn events_json(&mut self) -> String {
        let events = self.state.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Could not serialize events: {}", e);
            "[]".to_string()
        })
    }

    /// Full state snapshot as JSON
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|e| {
            log::warn!("Could not serialize state: {}", e);
            "{}".to_string()
        })
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn camera_y(&self) -> f32 {
        self.state.camera_y
    }
}
