//! Light/dark theme preference.
//!
//! The preference lives under a single storage key as the literal string
//! `"light"` or `"dark"`. Storage and the visual document are reached
//! through the [`PreferenceStorage`] and [`ThemeView`] capabilities so the
//! store runs the same in the browser and in tests.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::THEME_STORAGE_KEY;

/// Icon shown while the light theme is active.
pub const LIGHT_ICON: &str = "\u{1F319}";

/// Icon shown while the dark theme is active.
pub const DARK_ICON: &str = "\u{2600}\u{FE0F}";

/// Class added to the root and body elements for the dark theme.
pub const DARK_CLASS: &str = "dark";

/// Error raised by a preference storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is not available in this context (private mode, sandboxed frame).
    #[error("Storage unavailable")]
    Unavailable,

    /// The backend rejected the operation.
    #[error("Storage operation failed: {0}")]
    Failed(String),
}

/// The persisted theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// The opposite preference.
    pub fn flipped(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Value written to storage.
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Icon glyph: moon for light, sun for dark.
    pub fn icon(self) -> &'static str {
        match self {
            ThemePreference::Light => LIGHT_ICON,
            ThemePreference::Dark => DARK_ICON,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemePreference::Dark
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            _ => Err(()),
        }
    }
}

/// Key/value storage for the preference (`localStorage` in the browser).
pub trait PreferenceStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// The visual side of the theme: root/body classes and the icon glyph.
pub trait ThemeView {
    /// Add or remove the dark class on the document root and body.
    fn set_dark_class(&mut self, dark: bool);
    /// Replace the icon glyph.
    fn set_icon(&mut self, glyph: &str);
}

/// In-memory storage, used headlessly and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads, persists and displays the theme preference.
pub struct ThemeStore<S, V> {
    storage: S,
    view: V,
    key: String,
    current: ThemePreference,
}

impl<S: PreferenceStorage, V: ThemeView> ThemeStore<S, V> {
    /// Create a store using the default `theme` key.
    pub fn new(storage: S, view: V) -> Self {
        Self::with_key(storage, view, THEME_STORAGE_KEY)
    }

    pub fn with_key(storage: S, view: V, key: &str) -> Self {
        let mut store = Self {
            storage,
            view,
            key: key.to_string(),
            current: ThemePreference::Light,
        };
        store.current = store.get_preference();
        store
    }

    /// Read the persisted preference.
    ///
    /// Missing, unreadable or unrecognised values all mean light.
    pub fn get_preference(&self) -> ThemePreference {
        match self.storage.get(&self.key) {
            Ok(Some(value)) => value.parse().unwrap_or_default(),
            Ok(None) => ThemePreference::Light,
            Err(e) => {
                log::warn!("Failed to read theme preference: {}", e);
                ThemePreference::Light
            }
        }
    }

    /// Persist a preference and reflect it on the view.
    ///
    /// A storage write failure is logged; the view is still updated.
    pub fn set_preference(&mut self, preference: ThemePreference) {
        if let Err(e) = self.storage.set(&self.key, preference.as_str()) {
            log::warn!("Failed to persist theme preference: {}", e);
        }
        self.current = preference;
        self.apply(preference);
    }

    /// Reflect a preference on the view without persisting it.
    pub fn apply(&mut self, preference: ThemePreference) {
        self.view.set_dark_class(preference.is_dark());
        self.view.set_icon(preference.icon());
    }

    /// Apply the persisted preference, typically once at startup.
    pub fn restore(&mut self) -> ThemePreference {
        self.current = self.get_preference();
        self.apply(self.current);
        self.current
    }

    /// The preference currently shown.
    pub fn current(&self) -> ThemePreference {
        self.current
    }

    /// Flip the current preference and return the new one.
    pub fn toggle(&mut self) -> ThemePreference {
        let next = self.current.flipped();
        log::debug!("Theme toggled to {}", next);
        self.set_preference(next);
        next
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn view(&self) -> &V {
        &self.view
    }
}
