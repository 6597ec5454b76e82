//! Filterlab WASM - browser bindings for Filterlab
//!
//! This crate wires `filterlab-core` to the page: element lookups,
//! `localStorage`, preview styling and blob downloads.
//!
//! # Module Structure
//!
//! - `theme` - light/dark toggle backed by `localStorage`
//! - `editor` - upload, live filters and export
//! - `dom` - preview surface and downloader implementations
//! - `types` - JS-facing filter state snapshot
//!
//! # Usage
//!
//! ```typescript
//! import init, { Editor, ThemeController } from '@filterlab/wasm';
//!
//! await init();
//! const theme = new ThemeController('theme-icon', undefined);
//! const editor = new Editor();
//! await editor.load_file(fileInput.files[0]);
//! editor.apply_preset('sepia');
//! editor.export();
//! ```

use wasm_bindgen::prelude::*;

mod dom;
mod editor;
mod theme;
mod types;

pub use dom::{BrowserDownloader, DomPreview, ElementIds};
pub use editor::Editor;
pub use theme::{DomThemeView, LocalStorage, ThemeController};
pub use types::JsFilterState;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        // Fails only if a logger is already installed
        let _ = console_log::init_with_level(log::Level::Debug);
    }
    log::debug!("Filterlab {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }
}
