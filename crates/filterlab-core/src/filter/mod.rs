//! Filter state, descriptors and the live-preview engine.
//!
//! - `state` - slider parameters, presets and `FilterState`
//! - `descriptor` - ordered filter functions rendered to CSS
//! - `engine` - the Idle/Editing state machine driving a preview surface

mod descriptor;
pub(crate) mod engine;
mod state;

pub use descriptor::{FilterDescriptor, FilterOp};
pub use engine::{EnginePhase, FilterEngine, PreviewSurface};
pub use state::{
    FilterParameter, FilterState, Preset, DEFAULT_BLUR, DEFAULT_BRIGHTNESS, DEFAULT_CONTRAST,
    DEFAULT_SEPIA,
};

use thiserror::Error;

/// Errors from resolving control names.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A range control name that is not one of the four parameters.
    #[error("Unknown filter parameter: {0}")]
    UnknownParameter(String),

    /// A preset selector value that is not a known preset.
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}
