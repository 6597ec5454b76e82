//! Theme toggle bindings.
//!
//! Persists the preference in `localStorage` and reflects it as a `dark`
//! class on `<html>` and `<body>`, plus a moon/sun glyph in the toggle icon.

use filterlab_core::theme::{PreferenceStorage, StorageError, ThemeStore, ThemeView, DARK_CLASS};
use filterlab_core::config::THEME_STORAGE_KEY;
use filterlab_core::ThemePreference;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Storage};

use crate::dom::document;

/// `window.localStorage`, if the page may use it.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Failed(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Failed(format!("{:?}", e)))
    }
}

/// Root/body class lists and the icon element.
pub struct DomThemeView {
    targets: Vec<Element>,
    icon: Option<Element>,
}

impl DomThemeView {
    pub fn new(icon_id: Option<&str>) -> Result<Self, JsValue> {
        let document = document()?;
        let mut targets = Vec::with_capacity(2);
        if let Some(root) = document.document_element() {
            targets.push(root);
        }
        if let Some(body) = document.body() {
            targets.push(body.into());
        }
        let icon = icon_id.and_then(|id| document.get_element_by_id(id));
        Ok(Self { targets, icon })
    }
}

impl ThemeView for DomThemeView {
    fn set_dark_class(&mut self, dark: bool) {
        for element in &self.targets {
            if let Err(e) = element.class_list().toggle_with_force(DARK_CLASS, dark) {
                log::warn!("Failed to update theme class: {:?}", e);
            }
        }
    }

    fn set_icon(&mut self, glyph: &str) {
        if let Some(icon) = &self.icon {
            icon.set_text_content(Some(glyph));
        }
    }
}

/// Theme toggle for the page.
///
/// # Example (TypeScript)
/// ```typescript
/// const theme = new ThemeController('theme-icon', undefined);
/// toggleButton.addEventListener('click', () => theme.toggle());
/// ```
#[wasm_bindgen]
pub struct ThemeController {
    store: ThemeStore<LocalStorage, DomThemeView>,
}

#[wasm_bindgen]
impl ThemeController {
    /// Create the controller and apply the stored preference.
    ///
    /// `storage_key` defaults to `"theme"`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        icon_id: Option<String>,
        storage_key: Option<String>,
    ) -> Result<ThemeController, JsValue> {
        let view = DomThemeView::new(icon_id.as_deref())?;
        let key = storage_key.as_deref().unwrap_or(THEME_STORAGE_KEY);
        let mut store = ThemeStore::with_key(LocalStorage::new(), view, key);
        let preference = store.restore();
        log::debug!("Restored theme: {}", preference);
        Ok(Self { store })
    }

    /// Current preference, `"light"` or `"dark"`.
    #[wasm_bindgen(getter)]
    pub fn preference(&self) -> String {
        self.store.current().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dark(&self) -> bool {
        self.store.current().is_dark()
    }

    /// Flip the theme; returns the new preference.
    pub fn toggle(&mut self) -> String {
        self.store.toggle().to_string()
    }

    /// Set the theme explicitly (e.g. from a checkbox state).
    pub fn set_dark(&mut self, dark: bool) {
        let preference = if dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        };
        self.store.set_preference(preference);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_toggle_round_trip() {
        let mut theme = ThemeController::new(None, Some("test-theme".into())).unwrap();
        let original = theme.preference();

        theme.toggle();
        assert_ne!(theme.preference(), original);
        theme.toggle();
        assert_eq!(theme.preference(), original);

        let stored = LocalStorage::new().get("test-theme").unwrap();
        assert_eq!(stored, Some(original));
    }

    #[wasm_bindgen_test]
    fn test_set_dark_updates_root_class() {
        let mut theme = ThemeController::new(None, None).unwrap();
        theme.set_dark(true);

        let root = document().unwrap().document_element().unwrap();
        assert!(root.class_list().contains("dark"));

        theme.set_dark(false);
        assert!(!root.class_list().contains("dark"));
    }
}
