//! Session configuration.
//!
//! Every field has a default, so a partial JSON object coming from the page
//! (or none at all) yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::encode::ExportFormat;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted by the upload intake.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// File name extensions accepted when `require_known_extension` is set.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Storage key holding the theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Download name used when the original file name is unknown.
pub const FALLBACK_EXPORT_NAME: &str = "image.png";

/// Configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Uploads strictly larger than this are rejected.
    pub max_upload_bytes: u64,
    /// Accepted MIME types (compared case-insensitively).
    pub accepted_mime_types: Vec<String>,
    /// Also require a png/jpg/jpeg file name extension.
    pub require_known_extension: bool,
    /// Encoding used for exported images.
    pub export_format: ExportFormat,
    /// Download name when no original name is known.
    pub fallback_export_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            accepted_mime_types: ACCEPTED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            require_known_extension: false,
            export_format: ExportFormat::default(),
            fallback_export_name: FALLBACK_EXPORT_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a MIME type is on the accepted list.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        let mime = mime.trim();
        self.accepted_mime_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(mime))
    }
}

/// Check whether a file name ends in one of the accepted extensions.
pub fn has_known_extension(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ACCEPTED_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
