//! Upload intake: validation, decoding and stale-load detection.
//!
//! Validation is synchronous and runs on the file's metadata alone. The
//! bytes arrive later (the browser reads them asynchronously) and are
//! decoded by [`decode_upload`]. Every accepted file gets an
//! [`UploadTicket`]; only the most recent ticket may complete, so a slow
//! read for an older file can never overwrite a newer one.

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use thiserror::Error;

use crate::config::{has_known_extension, EditorConfig};
use crate::decode::{decode_image, SourceImage};

/// Upload errors, shown to the user as alerts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    /// The file is over the size limit.
    #[error("File is too large ({size} bytes, maximum is {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    /// The file is not a PNG or JPEG.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// The file name does not end in png, jpg or jpeg.
    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    /// The bytes could not be decoded as an image.
    #[error("Could not decode image: {0}")]
    DecodeFailed(String),
}

/// Metadata of a user-selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }
}

/// A file that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFile(FileInfo);

impl ValidFile {
    pub fn info(&self) -> &FileInfo {
        &self.0
    }
}

/// Check a file against the size limit and accepted types.
///
/// `TooLarge` only when the size is strictly greater than the limit.
pub fn validate(file: &FileInfo, config: &EditorConfig) -> Result<ValidFile, UploadError> {
    if file.size > config.max_upload_bytes {
        return Err(UploadError::TooLarge {
            size: file.size,
            max: config.max_upload_bytes,
        });
    }

    if !config.accepts_mime(&file.mime_type) {
        return Err(UploadError::UnsupportedType(file.mime_type.clone()));
    }

    if config.require_known_extension && !has_known_extension(&file.name) {
        let extension = match file.name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => format!(".{}", ext),
            _ => "(none)".to_string(),
        };
        return Err(UploadError::UnsupportedExtension(extension));
    }

    Ok(ValidFile(file.clone()))
}

/// A decoded upload; the original source for preview and export.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub display_name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    /// `data:` URI used as the preview image source.
    pub data_uri: String,
    /// Decoded, orientation-corrected pixels.
    pub source: SourceImage,
}

/// Decode the bytes of a validated file.
pub fn decode_upload(file: &ValidFile, bytes: Vec<u8>) -> Result<UploadedImage, UploadError> {
    let info = file.info();
    let source = decode_image(&bytes).map_err(|e| UploadError::DecodeFailed(e.to_string()))?;
    let data_uri = to_data_uri(&info.mime_type, &bytes);

    Ok(UploadedImage {
        size_bytes: bytes.len() as u64,
        display_name: info.name.clone(),
        mime_type: info.mime_type.clone(),
        data_uri,
        source,
    })
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, B64.encode(bytes))
}

/// Handle for one in-flight upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
    file: ValidFile,
}

impl UploadTicket {
    pub fn file(&self) -> &ValidFile {
        &self.file
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Hands out upload tickets; only the newest is current.
#[derive(Debug, Default)]
pub struct UploadIntake {
    latest: u64,
}

impl UploadIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new upload, superseding any in flight.
    pub fn begin(&mut self, file: ValidFile) -> UploadTicket {
        self.latest += 1;
        UploadTicket {
            generation: self.latest,
            file,
        }
    }

    pub fn is_current(&self, ticket: &UploadTicket) -> bool {
        ticket.generation == self.latest
    }
}
