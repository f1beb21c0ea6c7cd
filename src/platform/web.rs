//! Browser bindings
//!
//! Exposes the race driver to the JavaScript presentation layer. Each
//! animation frame the page calls `frame(performance.now())` and gets back a
//! JSON [`FrameOutput`](crate::sim::FrameOutput) with the snapshot, race
//! events and audio commands to play.

use wasm_bindgen::prelude::*;

use crate::audio::CommandQueueSink;
use crate::settings::Settings;
use crate::sim::{EngineToggle, RaceDriver, RaceSession, SurgingOpponent};
use crate::tuning::RaceConfig;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier module instance
        return;
    }
    log::info!("NeoRacer starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebRace {
    driver: RaceDriver,
    sink: CommandQueueSink,
}

#[wasm_bindgen]
impl WebRace {
    /// Build a race from optional JSON tuning. A `seed` swaps the default
    /// opponent for the surging one.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: Option<u64>) -> Result<WebRace, JsValue> {
        let config = match config_json {
            Some(json) => RaceConfig::from_json(&json).map_err(to_js)?,
            None => RaceConfig::default(),
        };
        let session = match seed {
            Some(seed) => {
                let surge = config.surge;
                RaceSession::with_opponent(config, Box::new(SurgingOpponent::new(seed, surge)))
            }
            None => RaceSession::new(config),
        };
        Ok(WebRace {
            driver: RaceDriver::with_session(session, Settings::load()),
            sink: CommandQueueSink::default(),
        })
    }

    pub fn set_accelerating(&mut self, held: bool) {
        self.driver.set_accelerating(held);
    }

    pub fn set_braking(&mut self, held: bool) {
        self.driver.set_braking(held);
    }

    /// Returns false when the car is still rolling
    pub fn toggle_engine(&mut self) -> bool {
        !matches!(self.driver.toggle_engine(), EngineToggle::Rejected { .. })
    }

    pub fn toggle_pause(&mut self) {
        self.driver.request_pause();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.driver.set_muted(muted);
        self.driver.settings().save();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.driver.set_focused(focused);
    }

    /// Back to the garage screen
    pub fn leave(&mut self) {
        self.driver.leave(&mut self.sink);
    }

    /// Advance to `now_ms` (from `performance.now()`) and return the frame as JSON
    pub fn frame(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let output = self.driver.frame_output(now_ms / 1000.0, &mut self.sink);
        serde_json::to_string(&output).map_err(to_js)
    }
}
