//! Filterlab Core - filter, upload and export logic
//!
//! This crate holds everything behind the Filterlab page that does not touch
//! the browser directly: theme preference handling, upload validation and
//! decoding, the live filter engine, and the export renderer. Browser
//! objects are reached only through small capability traits
//! ([`PreviewSurface`], [`Downloader`], [`PreferenceStorage`],
//! [`ThemeView`]), so the whole crate runs headless in tests.

pub mod config;
pub mod decode;
pub mod encode;
pub mod export;
pub mod filter;
pub mod render;
pub mod session;
pub mod theme;
pub mod upload;

pub use config::EditorConfig;
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{EncodeError, ExportFormat};
pub use export::{Downloader, ExportArtifact, ExportError};
pub use filter::{
    EnginePhase, FilterDescriptor, FilterEngine, FilterError, FilterOp, FilterParameter,
    FilterState, Preset, PreviewSurface,
};
pub use render::{render, RenderError};
pub use session::{EditorSession, UploadOutcome};
pub use theme::{
    MemoryStorage, PreferenceStorage, StorageError, ThemePreference, ThemeStore, ThemeView,
};
pub use upload::{FileInfo, UploadError, UploadTicket, UploadedImage};
