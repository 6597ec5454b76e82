//! Export pipeline: bake the current filters into a downloadable file.
//!
//! The original, unfiltered source is rendered at its natural size with the
//! composed descriptor of the current state, encoded, and handed to a
//! [`Downloader`]. Failures are returned to the caller; nothing is
//! downloaded in that case.

use thiserror::Error;

use crate::decode::SourceImage;
use crate::encode::{encode, EncodeError, ExportFormat};
use crate::filter::{FilterDescriptor, FilterState};
use crate::render::{render, RenderError};

/// Prefix added to the original file name.
pub const EXPORT_PREFIX: &str = "filtered_";

/// Errors from the export path.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to draw image: {0}")]
    Render(#[from] RenderError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] EncodeError),

    /// The download could not be started.
    #[error("Download failed: {0}")]
    DownloadFailed(String),
}

/// Triggers a client-side download.
///
/// Implementations that allocate temporary resources (object URLs) must
/// release them before returning.
pub trait Downloader {
    fn trigger(&mut self, bytes: &[u8], filename: &str, mime_type: &str)
        -> Result<(), ExportError>;
}

/// An encoded export ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

/// Suggested download name: `filtered_<name>`, or `fallback` when the name
/// is unknown or empty after cleaning.
///
/// Directory components and control characters are stripped.
pub fn export_file_name(original: Option<&str>, fallback: &str) -> String {
    let cleaned = original.map(clean_file_name).unwrap_or_default();
    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        format!("{}{}", EXPORT_PREFIX, cleaned)
    }
}

fn clean_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Render and encode `source` with the composed filters of `state`.
pub fn build_artifact(
    source: &SourceImage,
    state: &FilterState,
    filename: String,
    format: ExportFormat,
) -> Result<ExportArtifact, ExportError> {
    let descriptor = FilterDescriptor::composed(state);
    log::debug!(
        "Exporting {}x{} with {}",
        source.width,
        source.height,
        descriptor
    );

    let rendered = render(source, &descriptor)?;
    let bytes = encode(&rendered, format)?;

    Ok(ExportArtifact {
        bytes,
        filename,
        mime_type: format.mime_type().to_string(),
        width: rendered.width,
        height: rendered.height,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::decode::decode_image;
    use crate::filter::FilterParameter;

    /// Downloader that keeps every triggered download.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingDownloader {
        pub downloads: Vec<(Vec<u8>, String, String)>,
        pub fail: bool,
    }

    impl Downloader for RecordingDownloader {
        fn trigger(
            &mut self,
            bytes: &[u8],
            filename: &str,
            mime_type: &str,
        ) -> Result<(), ExportError> {
            if self.fail {
                return Err(ExportError::DownloadFailed("blocked".to_string()));
            }
            self.downloads
                .push((bytes.to_vec(), filename.to_string(), mime_type.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_file_name() {
        assert_eq!(
            export_file_name(Some("beach.jpg"), "image.png"),
            "filtered_beach.jpg"
        );
        assert_eq!(export_file_name(None, "image.png"), "image.png");
        assert_eq!(export_file_name(Some(""), "image.png"), "image.png");
    }

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(
            export_file_name(Some("C:\\Users\\me\\cat.png"), "image.png"),
            "filtered_cat.png"
        );
        assert_eq!(
            export_file_name(Some("../../etc/dog.jpeg"), "image.png"),
            "filtered_dog.jpeg"
        );
        assert_eq!(export_file_name(Some("dir/"), "image.png"), "image.png");
    }

    #[test]
    fn test_file_name_strips_control_chars() {
        assert_eq!(
            export_file_name(Some("bad\nname.png"), "image.png"),
            "filtered_badname.png"
        );
    }

    #[test]
    fn test_build_artifact_png() {
        let source = SourceImage::new(2, 2, vec![100; 16]);
        let mut state = FilterState::new();
        state.set(FilterParameter::Brightness, 200);

        let artifact =
            build_artifact(&source, &state, "filtered_a.png".to_string(), ExportFormat::Png)
                .unwrap();

        assert_eq!(artifact.mime_type, "image/png");
        assert_eq!((artifact.width, artifact.height), (2, 2));

        let decoded = decode_image(&artifact.bytes).unwrap();
        assert_eq!(&decoded.pixels[..4], &[200, 200, 200, 100]);
    }

    #[test]
    fn test_build_artifact_uses_composed_form() {
        // A literal preset leaves its look on the preview only; export
        // bakes the composed sliders, which are at default here.
        let source = SourceImage::new(1, 1, vec![10, 20, 30, 255]);
        let mut state = FilterState::new();
        state.select_preset(crate::filter::Preset::Invert);

        let artifact =
            build_artifact(&source, &state, "x.png".to_string(), ExportFormat::Png).unwrap();
        let decoded = decode_image(&artifact.bytes).unwrap();
        assert_eq!(decoded.pixels, vec![10, 20, 30, 255]);
    }

    #[test]
    fn test_build_artifact_jpeg() {
        let source = SourceImage::new(8, 8, vec![128; 256]);
        let artifact = build_artifact(
            &source,
            &FilterState::new(),
            "filtered_a.jpg".to_string(),
            ExportFormat::jpeg(),
        )
        .unwrap();

        assert_eq!(artifact.mime_type, "image/jpeg");
        assert_eq!(&artifact.bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_build_artifact_draw_failure() {
        let broken = SourceImage {
            width: 3,
            height: 3,
            pixels: vec![0; 5],
        };
        let result = build_artifact(
            &broken,
            &FilterState::new(),
            "x.png".to_string(),
            ExportFormat::Png,
        );
        assert!(matches!(result, Err(ExportError::Render(_))));
    }
}
