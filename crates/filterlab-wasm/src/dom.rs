//! Browser implementations of the core capabilities.
//!
//! - [`DomPreview`] - the preview `<img>` plus the upload box, file name
//!   label and action controls around it
//! - [`BrowserDownloader`] - Blob + object URL + `<a download>` click

use filterlab_core::{Downloader, ExportError, PreviewSurface};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, HtmlElement, HtmlImageElement, Url};

/// Element ids the editor looks up.
///
/// Only the preview image is required; the others are skipped when the
/// page does not have them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub preview_image: String,
    pub preview_container: String,
    pub upload_box: String,
    pub file_name: String,
    pub actions: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            preview_image: "preview-image".to_string(),
            preview_container: "preview-container".to_string(),
            upload_box: "upload-box".to_string(),
            file_name: "file-name".to_string(),
            actions: "process-btn".to_string(),
        }
    }
}

pub(crate) fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))
}

fn optional_element(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

/// The live preview on the page.
pub struct DomPreview {
    image: HtmlImageElement,
    container: Option<HtmlElement>,
    upload_box: Option<HtmlElement>,
    file_name: Option<HtmlElement>,
    actions: Option<HtmlElement>,
}

impl DomPreview {
    /// Look up the preview elements by id.
    pub fn from_ids(ids: &ElementIds) -> Result<Self, JsValue> {
        let document = document()?;
        let image = document
            .get_element_by_id(&ids.preview_image)
            .ok_or_else(|| {
                JsValue::from_str(&format!("Missing preview element #{}", ids.preview_image))
            })?
            .dyn_into::<HtmlImageElement>()
            .map_err(|_| JsValue::from_str("Preview element is not an <img>"))?;

        Ok(Self {
            image,
            container: optional_element(&document, &ids.preview_container),
            upload_box: optional_element(&document, &ids.upload_box),
            file_name: optional_element(&document, &ids.file_name),
            actions: optional_element(&document, &ids.actions),
        })
    }
}

impl PreviewSurface for DomPreview {
    fn apply_filter(&mut self, css: &str) {
        if let Err(e) = self.image.style().set_property("filter", css) {
            log::warn!("Failed to set preview filter: {:?}", e);
        }
    }

    fn natural_size(&self) -> Option<(u32, u32)> {
        match (self.image.natural_width(), self.image.natural_height()) {
            (0, _) | (_, 0) => None,
            size => Some(size),
        }
    }

    fn show_image(&mut self, source: &str, display_name: &str) {
        self.image.set_src(source);
        if let Some(label) = &self.file_name {
            label.set_text_content(Some(display_name));
        }
        if let Some(upload_box) = &self.upload_box {
            upload_box.set_hidden(true);
        }
        if let Some(container) = &self.container {
            container.set_hidden(false);
        }
        if let Some(actions) = &self.actions {
            actions.set_hidden(false);
        }
    }
}

/// Downloads a byte buffer through a temporary object URL.
#[derive(Debug, Default)]
pub struct BrowserDownloader;

impl BrowserDownloader {
    fn start(bytes: &[u8], filename: &str, mime_type: &str) -> Result<(), JsValue> {
        let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

        let url = Url::create_object_url_with_blob(&blob)?;
        let clicked = document()
            .and_then(|doc| doc.create_element("a"))
            .and_then(|el| {
                el.dyn_into::<HtmlAnchorElement>()
                    .map_err(|_| JsValue::from_str("Failed to create anchor"))
            })
            .map(|anchor| {
                anchor.set_href(&url);
                anchor.set_download(filename);
                anchor.click();
            });

        // Release the URL whether or not the click went through
        Url::revoke_object_url(&url)?;
        clicked
    }
}

impl Downloader for BrowserDownloader {
    fn trigger(
        &mut self,
        bytes: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<(), ExportError> {
        Self::start(bytes, filename, mime_type)
            .map_err(|e| ExportError::DownloadFailed(format!("{:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ids() {
        let ids = ElementIds::default();
        assert_eq!(ids.preview_image, "preview-image");
        assert_eq!(ids.upload_box, "upload-box");
        assert_eq!(ids.actions, "process-btn");
    }
}
