use log::{Level, LevelFilter, Log, Metadata, Record};
use stickfight_core::{
    default_config, MatchController, MatchSnapshot, PlayerInput, Slot, Tuning,
};
use wasm_bindgen::prelude::*;

// ── Console logging ─────────────────────────────────────────

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install panic hook so WASM panics show in browser console instead of silently freezing,
/// and route `log` output to the console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

/// Raise or lower console verbosity: "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).ok_or_else(|| JsValue::from_str(&format!("unknown log level: {level}")))?;
    log::set_max_level(filter);
    Ok(())
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.parse().ok()
}

// ── Bridging helpers ────────────────────────────────────────

/// 1 → player 1, 2 → player 2.
fn slot_from_player(player: u8) -> Result<Slot, JsValue> {
    player
        .checked_sub(1)
        .and_then(|i| Slot::from_index(i as usize))
        .ok_or_else(|| JsValue::from_str(&format!("no such player: {player}")))
}

/// 0 while undecided, otherwise the winning player number.
fn winner_code(winner: Option<Slot>) -> u8 {
    winner.map_or(0, Slot::player_number)
}

fn parse_inputs(json: &str) -> Result<[PlayerInput; 2], String> {
    serde_json::from_str(json).map_err(|e| format!("bad input pair: {e}"))
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ── Match handle ────────────────────────────────────────────

#[wasm_bindgen]
pub struct WasmMatch {
    inner: MatchController,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Two human players with default tuning.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WasmMatch {
        WasmMatch {
            inner: MatchController::new(default_config(seed)),
        }
    }

    /// Create from RON tuning text. Missing fields keep their defaults.
    pub fn with_tuning(seed: u32, tuning_ron: &str) -> Result<WasmMatch, JsValue> {
        let tuning = Tuning::from_ron_str(tuning_ron).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut config = default_config(seed);
        config.tuning = tuning;
        Ok(WasmMatch {
            inner: MatchController::new(config),
        })
    }

    /// Player 1 against the AI.
    pub fn versus_ai(seed: u32) -> WasmMatch {
        let mut config = default_config(seed);
        config.ai_enabled = [false, true];
        WasmMatch {
            inner: MatchController::new(config),
        }
    }

    /// Step the simulation by one tick with held buttons only.
    pub fn step(&mut self, p1_buttons: u8, p2_buttons: u8) {
        self.inner
            .tick([PlayerInput::held(p1_buttons), PlayerInput::held(p2_buttons)]);
    }

    /// Step with a full input pair: `[{buttons, strike?}, {buttons, strike?}]`.
    pub fn step_inputs(&mut self, inputs: JsValue) -> Result<(), JsValue> {
        // JSON.stringify → serde_json handles the optional tagged strike more predictably than
        // serde_wasm_bindgen::from_value.
        let json = js_sys::JSON::stringify(&inputs)
            .map(String::from)
            .map_err(|_| JsValue::from_str("inputs are not JSON-serializable"))?;
        let pair = parse_inputs(&json).map_err(|e| JsValue::from_str(&e))?;
        self.inner.tick(pair);
        Ok(())
    }

    /// Full snapshot as a JS object for rendering.
    pub fn export_state(&self) -> Result<JsValue, JsValue> {
        let snapshot: MatchSnapshot = self.inner.snapshot();
        to_js(&snapshot)
    }

    /// Drain the events of the last tick.
    pub fn take_events(&mut self) -> Result<JsValue, JsValue> {
        let events = self.inner.take_events();
        to_js(&events)
    }

    pub fn set_hardcore(&mut self, enabled: bool) {
        self.inner.set_hardcore(enabled);
    }

    pub fn set_survival(&mut self, enabled: bool) {
        self.inner.set_survival(enabled);
    }

    pub fn set_ai(&mut self, player: u8, enabled: bool) -> Result<(), JsValue> {
        let slot = slot_from_player(player)?;
        self.inner.set_ai_enabled(slot, enabled);
        Ok(())
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.inner.set_paused(paused);
    }

    pub fn toggle_pause(&mut self) {
        self.inner.toggle_pause();
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    // Quick accessors
    pub fn tick(&self) -> f64 {
        self.inner.tick_count() as f64
    }
    pub fn game_over(&self) -> bool {
        self.inner.is_game_over()
    }
    pub fn paused(&self) -> bool {
        self.inner.is_paused()
    }
    pub fn winner(&self) -> u8 {
        winner_code(self.inner.winner())
    }
}
