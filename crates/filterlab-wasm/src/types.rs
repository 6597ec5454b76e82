//! JS-facing snapshot of the filter state.

use filterlab_core::{FilterDescriptor, FilterState};
use wasm_bindgen::prelude::*;

/// Read-only copy of the slider values and preset, used to sync controls
/// after a preset or reset.
#[wasm_bindgen]
pub struct JsFilterState {
    inner: FilterState,
}

#[wasm_bindgen]
impl JsFilterState {
    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> u32 {
        self.inner.brightness
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> u32 {
        self.inner.contrast
    }

    #[wasm_bindgen(getter)]
    pub fn sepia(&self) -> u32 {
        self.inner.sepia
    }

    #[wasm_bindgen(getter)]
    pub fn blur(&self) -> u32 {
        self.inner.blur
    }

    /// Active preset name (`"none"` after any individual slider change).
    #[wasm_bindgen(getter)]
    pub fn preset(&self) -> String {
        self.inner.active_preset.to_string()
    }

    pub fn is_default(&self) -> bool {
        self.inner.is_default()
    }

    /// Slider-composed CSS filter for this state.
    pub fn composed_css(&self) -> String {
        FilterDescriptor::composed(&self.inner).to_css()
    }

    /// Serialize to a plain JS object
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl From<FilterState> for JsFilterState {
    fn from(inner: FilterState) -> Self {
        Self { inner }
    }
}
