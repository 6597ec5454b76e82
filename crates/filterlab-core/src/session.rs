//! The editor session: one page's worth of state.
//!
//! `EditorSession` owns the filter engine, the current upload and the
//! capabilities it needs (preview surface, downloader). It lives as long as
//! the page and is the only writer of its state.

use crate::config::EditorConfig;
use crate::export::{build_artifact, export_file_name, Downloader, ExportArtifact, ExportError};
use crate::filter::{FilterEngine, FilterError, FilterParameter, FilterState, Preset, PreviewSurface};
use crate::upload::{
    decode_upload, validate, FileInfo, UploadError, UploadIntake, UploadTicket, UploadedImage,
};

/// Result of completing an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The image is now the preview and export source.
    Loaded,
    /// A newer upload started meanwhile; this one was dropped.
    Stale,
}

pub struct EditorSession<P, D> {
    config: EditorConfig,
    engine: FilterEngine<P>,
    downloader: D,
    intake: UploadIntake,
    image: Option<UploadedImage>,
}

impl<P: PreviewSurface, D: Downloader> EditorSession<P, D> {
    pub fn new(surface: P, downloader: D, config: EditorConfig) -> Self {
        Self {
            config,
            engine: FilterEngine::new(surface),
            downloader,
            intake: UploadIntake::new(),
            image: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn engine(&self) -> &FilterEngine<P> {
        &self.engine
    }

    pub fn filter_state(&self) -> &FilterState {
        self.engine.state()
    }

    pub fn is_editing(&self) -> bool {
        self.engine.is_editing()
    }

    /// The currently loaded image, if any.
    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn downloader(&self) -> &D {
        &self.downloader
    }

    /// Validate a selected file and start its upload.
    ///
    /// On error nothing changes. On success any upload still in flight
    /// becomes stale.
    pub fn begin_upload(&mut self, file: &FileInfo) -> Result<UploadTicket, UploadError> {
        let valid = validate(file, &self.config).inspect_err(|e| {
            log::info!("Rejected upload {:?}: {}", file.name, e);
        })?;
        let ticket = self.intake.begin(valid);
        log::debug!("Upload {} started for {:?}", ticket.generation(), file.name);
        Ok(ticket)
    }

    /// Finish an upload once its bytes have been read.
    ///
    /// Stale tickets are ignored. A decode failure leaves the previous image
    /// and filters in place.
    pub fn complete_upload(
        &mut self,
        ticket: UploadTicket,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, UploadError> {
        if !self.intake.is_current(&ticket) {
            log::warn!(
                "Ignoring stale upload {} for {:?}",
                ticket.generation(),
                ticket.file().info().name
            );
            return Ok(UploadOutcome::Stale);
        }

        let uploaded = decode_upload(ticket.file(), bytes).inspect_err(|e| {
            log::warn!("Upload {} failed: {}", ticket.generation(), e);
        })?;

        log::info!(
            "Loaded {:?} ({}x{}, {} bytes)",
            uploaded.display_name,
            uploaded.source.width,
            uploaded.source.height,
            uploaded.size_bytes
        );

        self.engine
            .surface_mut()
            .show_image(&uploaded.data_uri, &uploaded.display_name);
        self.image = Some(uploaded);
        self.engine.on_loaded();
        Ok(UploadOutcome::Loaded)
    }

    /// Validate and load in one step, for bytes already in memory.
    pub fn load(&mut self, file: &FileInfo, bytes: Vec<u8>) -> Result<UploadOutcome, UploadError> {
        let ticket = self.begin_upload(file)?;
        self.complete_upload(ticket, bytes)
    }

    pub fn set_parameter(&mut self, parameter: FilterParameter, value: i64) -> bool {
        self.engine.set_parameter(parameter, value)
    }

    pub fn set_parameter_by_name(&mut self, name: &str, value: i64) -> Result<bool, FilterError> {
        self.engine.set_parameter_by_name(name, value)
    }

    pub fn apply_preset(&mut self, preset: Preset) -> bool {
        self.engine.apply_preset(preset)
    }

    pub fn apply_preset_by_name(&mut self, name: &str) -> Result<bool, FilterError> {
        self.engine.apply_preset_by_name(name)
    }

    pub fn reset(&mut self) -> bool {
        self.engine.reset()
    }

    /// CSS filter currently on the preview.
    pub fn descriptor(&self) -> String {
        self.engine.applied_descriptor().to_css()
    }

    /// Export the current image with the current filters.
    ///
    /// Returns `Ok(None)` when there is nothing to export. On error no
    /// download is triggered.
    pub fn export(&mut self) -> Result<Option<ExportArtifact>, ExportError> {
        let image = match (&self.image, self.engine.is_editing()) {
            (Some(image), true) => image,
            _ => {
                log::debug!("Export requested with no image loaded");
                return Ok(None);
            }
        };

        // The decoded source is authoritative; a preview that reports another
        // size means the browser oriented the image differently.
        if let Some((width, height)) = self.engine.surface().natural_size() {
            if (width, height) != image.source.dimensions() {
                log::warn!(
                    "Preview is {}x{} but the source decoded as {}x{}; exporting the source size",
                    width,
                    height,
                    image.source.width,
                    image.source.height
                );
            }
        }

        let filename = export_file_name(
            Some(image.display_name.as_str()),
            &self.config.fallback_export_name,
        );
        let artifact = build_artifact(
            &image.source,
            self.engine.state(),
            filename,
            self.config.export_format,
        )?;

        self.downloader
            .trigger(&artifact.bytes, &artifact.filename, &artifact.mime_type)?;
        log::info!(
            "Exported {} ({} bytes)",
            artifact.filename,
            artifact.bytes.len()
        );
        Ok(Some(artifact))
    }
}
