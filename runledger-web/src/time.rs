use runledger_core::TimeSource;
use runledger_core::numbers::floor_f64_to_i64;

/// Wall clock read from `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsTimeSource;

impl TimeSource for JsTimeSource {
    fn now_ms(&self) -> i64 {
        floor_f64_to_i64(js_sys::Date::now())
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn date_now_is_after_2020() {
        assert!(JsTimeSource.now_ms() > 1_577_836_800_000);
    }
}
