#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bindings;
pub mod fields;
pub mod storage;
pub mod ticker;
pub mod time;

pub use bindings::RunLedgerApp;
pub use storage::{LocalStorageStore, WebStorageError};
pub use ticker::RefreshTicker;
pub use time::JsTimeSource;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
