//! JavaScript-facing facade over the core app state.
//!
//! The page script forwards DOM events here and redraws from
//! [`RunLedgerApp::view_json`]; it never computes a figure itself.
use log::warn;
use runledger_core::{
    AppState, ComparisonReport, Decision, ElapsedParts, Page, Projection, TrackerStats,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::fields::{calculator_field, config_field, page_name, slot, strategy_field};
use crate::storage::LocalStorageStore;
use crate::ticker::RefreshTicker;
use crate::time::JsTimeSource;

/// Everything the page renders, in one JSON document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewModel {
    page: &'static str,
    clock: String,
    tracker: TrackerStats,
    projection: Projection,
    comparison: ComparisonReport,
    verdict: String,
}

#[wasm_bindgen]
pub struct RunLedgerApp {
    app: AppState<LocalStorageStore, JsTimeSource>,
    ticker: RefreshTicker,
    on_tick: Option<js_sys::Function>,
}

impl Default for RunLedgerApp {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl RunLedgerApp {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            app: AppState::load(LocalStorageStore, JsTimeSource),
            ticker: RefreshTicker::new(),
            on_tick: None,
        }
    }

    /// Register the redraw callback and arm the ticker if a restored session
    /// is already running.
    #[wasm_bindgen(js_name = setRefreshCallback)]
    pub fn set_refresh_callback(&mut self, on_tick: js_sys::Function) {
        self.ticker.stop();
        self.on_tick = Some(on_tick);
        self.sync_ticker();
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn page(&self) -> String {
        page_name(self.app.page()).to_string()
    }

    pub fn navigate(&mut self, name: &str) {
        self.app.navigate(Page::from_name(name));
    }

    #[wasm_bindgen(js_name = startTimer)]
    pub fn start_timer(&mut self) {
        self.app.tracker_mut().start_timer();
        self.sync_ticker();
    }

    #[wasm_bindgen(js_name = pauseTimer)]
    pub fn pause_timer(&mut self) {
        self.app.tracker_mut().pause_timer();
        self.sync_ticker();
    }

    #[wasm_bindgen(js_name = resetTimer)]
    pub fn reset_timer(&mut self) {
        self.app.tracker_mut().reset_timer();
        self.sync_ticker();
    }

    #[wasm_bindgen(js_name = recordDrop)]
    pub fn record_drop(&mut self) {
        self.app.tracker_mut().record_drop();
    }

    #[wasm_bindgen(js_name = recordNoDrop)]
    pub fn record_no_drop(&mut self) {
        self.app.tracker_mut().record_no_drop();
    }

    pub fn undo(&mut self) -> bool {
        self.app.tracker_mut().undo()
    }

    /// Ask the player through `window.confirm` and wipe statistics only on
    /// approval. Returns whether the reset ran.
    #[wasm_bindgen(js_name = resetStatistics)]
    pub fn reset_statistics(&mut self) -> bool {
        let prompt = self.app.tracker().request_reset_statistics();
        let approved = web_sys::window()
            .and_then(|window| window.confirm_with_message(prompt.message).ok())
            .unwrap_or(false);
        let decision = if approved {
            Decision::Confirm
        } else {
            Decision::Cancel
        };
        let ran = self.app.tracker_mut().resolve(prompt, decision);
        self.sync_ticker();
        ran
    }

    #[wasm_bindgen(js_name = editConfig)]
    pub fn edit_config(&mut self, name: &str, raw: &str) {
        match config_field(name) {
            Some(field) => self.app.tracker_mut().edit_config(field, raw),
            None => warn!("Unknown tracker field \"{name}\""),
        }
    }

    #[wasm_bindgen(js_name = commitConfig)]
    pub fn commit_config(&mut self, name: &str) {
        match config_field(name) {
            Some(field) => self.app.tracker_mut().commit_config(field),
            None => warn!("Unknown tracker field \"{name}\""),
        }
    }

    #[wasm_bindgen(js_name = editCalculator)]
    pub fn edit_calculator(&mut self, name: &str, raw: &str) {
        match calculator_field(name) {
            Some(field) => self.app.edit_calculator(field, raw),
            None => warn!("Unknown calculator field \"{name}\""),
        }
    }

    #[wasm_bindgen(js_name = commitCalculator)]
    pub fn commit_calculator(&mut self, name: &str) {
        match calculator_field(name) {
            Some(field) => self.app.commit_calculator(field),
            None => warn!("Unknown calculator field \"{name}\""),
        }
    }

    #[wasm_bindgen(js_name = editStrategy)]
    pub fn edit_strategy(&mut self, card: u8, name: &str, raw: &str) {
        match (slot(card), strategy_field(name)) {
            (Some(slot), Some(field)) => self.app.edit_strategy(slot, field, raw),
            _ => warn!("Unknown strategy field {card}/\"{name}\""),
        }
    }

    #[wasm_bindgen(js_name = commitStrategy)]
    pub fn commit_strategy(&mut self, card: u8, name: &str) {
        match (slot(card), strategy_field(name)) {
            (Some(slot), Some(field)) => self.app.commit_strategy(slot, field),
            _ => warn!("Unknown strategy field {card}/\"{name}\""),
        }
    }

    /// Current figures for every view as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer message if the view cannot be encoded.
    #[wasm_bindgen(js_name = viewJson)]
    pub fn view_json(&self) -> Result<String, JsValue> {
        let tracker = self.app.tracker().snapshot();
        let comparison = self.app.comparison();
        let view = ViewModel {
            page: page_name(self.app.page()),
            clock: ElapsedParts::from_millis(tracker.elapsed_ms).to_string(),
            verdict: comparison.to_string(),
            tracker,
            projection: self.app.projection(),
            comparison,
        };
        serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl RunLedgerApp {
    fn sync_ticker(&mut self) {
        let running = self.app.tracker().clock().is_running();
        match &self.on_tick {
            Some(callback) => {
                let callback = callback.clone();
                self.ticker.sync(running, move || {
                    if let Err(err) = callback.call0(&JsValue::NULL) {
                        warn!("Refresh callback failed: {err:?}");
                    }
                });
            }
            None => self.ticker.stop(),
        }
    }
}
