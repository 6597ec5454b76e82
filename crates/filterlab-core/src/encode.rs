//! Encoding rendered images for download.
//!
//! PNG is the default and keeps alpha. JPEG is available with a quality
//! setting and flattens the image to RGB.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::SourceImage;

/// Default JPEG quality when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur while encoding an export.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder itself failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg {
        /// 1-100; out-of-range values are clamped.
        quality: u8,
    },
}

impl ExportFormat {
    pub fn jpeg() -> Self {
        ExportFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// MIME type of the encoded blob.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }
}

/// Encode an image in the given format.
pub fn encode(image: &SourceImage, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        ExportFormat::Png => encode_png(image),
        ExportFormat::Jpeg { quality } => encode_jpeg(image, quality),
    }
}

/// Encode RGBA pixels as PNG.
pub fn encode_png(image: &SourceImage) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode as JPEG, dropping alpha.
///
/// Quality is clamped to 1-100.
pub fn encode_jpeg(image: &SourceImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let rgb: Vec<u8> = image
        .pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(&rgb, image.width, image.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

fn validate(image: &SourceImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = (image.width as usize) * (image.height as usize) * 4;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }
    Ok(())
}
