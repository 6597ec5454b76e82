//! Editor bindings: upload, live filters and export for one page.
//!
//! The session sits behind `Rc<RefCell<..>>` so the async file read in
//! [`Editor::load_file`] can finish after the call returns. All access is
//! from the page's single thread.

use std::cell::RefCell;
use std::rc::Rc;

use filterlab_core::upload::validate;
use filterlab_core::{EditorConfig, EditorSession, FileInfo, UploadError, UploadOutcome};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::File;

use crate::dom::{BrowserDownloader, DomPreview, ElementIds};
use crate::types::JsFilterState;

type Session = EditorSession<DomPreview, BrowserDownloader>;

/// Read an optional options object, using defaults when it is absent.
fn options_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Build a `FileInfo` from `File` metadata.
///
/// JS sizes are doubles; anything negative or not finite counts as 0.
pub(crate) fn file_info(name: String, size: f64, mime_type: String) -> FileInfo {
    let size = if size.is_finite() && size > 0.0 {
        size as u64
    } else {
        0
    };
    FileInfo::new(name, size, mime_type)
}

/// Message for a file whose bytes could not be read.
///
/// Reported the same way as an undecodable image.
pub(crate) fn read_failure_message(detail: &str) -> String {
    UploadError::DecodeFailed(format!("could not read file ({})", detail)).to_string()
}

/// The image editor for one page.
///
/// # Example (TypeScript)
/// ```typescript
/// const editor = new Editor(undefined, { export_format: 'png' });
///
/// fileInput.addEventListener('change', async () => {
///   try {
///     await editor.load_file(fileInput.files[0]);
///   } catch (err) {
///     alert(err);
///   }
/// });
/// brightness.addEventListener('input', () =>
///   editor.set_parameter('brightness', brightness.valueAsNumber));
/// saveButton.addEventListener('click', () => editor.export());
/// ```
#[wasm_bindgen]
pub struct Editor {
    session: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor bound to the page's preview elements.
    ///
    /// `elements` overrides element ids and `config` overrides
    /// `EditorConfig` fields; both may be `undefined`.
    #[wasm_bindgen(constructor)]
    pub fn new(elements: JsValue, config: JsValue) -> Result<Editor, JsValue> {
        let ids: ElementIds = options_or_default(elements)?;
        let config: EditorConfig = options_or_default(config)?;
        let preview = DomPreview::from_ids(&ids)?;

        Ok(Self {
            session: Rc::new(RefCell::new(EditorSession::new(
                preview,
                BrowserDownloader,
                config,
            ))),
        })
    }

    /// Check a file without loading it. Throws the validation message.
    pub fn validate_file(&self, file: &File) -> Result<(), JsValue> {
        let info = file_info(file.name(), file.size(), file.type_());
        validate(&info, self.session.borrow().config())
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Validate and load a file.
    ///
    /// Validation errors are thrown synchronously. The returned promise
    /// resolves to `true` once the image is shown, `false` if a newer upload
    /// replaced it first, and rejects if the image cannot be decoded.
    pub fn load_file(&self, file: File) -> Result<js_sys::Promise, JsValue> {
        let info = file_info(file.name(), file.size(), file.type_());
        let ticket = self
            .session
            .borrow_mut()
            .begin_upload(&info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let session = Rc::clone(&self.session);
        Ok(future_to_promise(async move {
            let buffer = JsFuture::from(file.array_buffer())
                .await
                .map_err(|e| JsValue::from_str(&read_failure_message(&format!("{:?}", e))))?;
            let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

            let outcome = session
                .borrow_mut()
                .complete_upload(ticket, bytes)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(JsValue::from_bool(outcome == UploadOutcome::Loaded))
        }))
    }

    /// Load bytes already in memory (drag-and-drop, tests).
    pub fn load_bytes(&self, name: String, mime_type: String, bytes: Vec<u8>) -> Result<bool, JsValue> {
        let info = FileInfo::new(name, bytes.len() as u64, mime_type);
        self.session
            .borrow_mut()
            .load(&info, bytes)
            .map(|outcome| outcome == UploadOutcome::Loaded)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set a slider value. Returns `false` while no image is loaded.
    pub fn set_parameter(&self, name: &str, value: f64) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .set_parameter_by_name(name, value.round() as i64)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Select a preset. Returns `false` while no image is loaded.
    pub fn apply_preset(&self, name: &str) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .apply_preset_by_name(name)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset(&self) -> bool {
        self.session.borrow_mut().reset()
    }

    /// CSS filter currently on the preview.
    pub fn descriptor(&self) -> String {
        self.session.borrow().descriptor()
    }

    pub fn filter_state(&self) -> JsFilterState {
        JsFilterState::from(*self.session.borrow().filter_state())
    }

    #[wasm_bindgen(getter)]
    pub fn is_editing(&self) -> bool {
        self.session.borrow().is_editing()
    }

    /// Download the filtered image.
    ///
    /// Returns `false` when nothing is loaded; throws if drawing, encoding
    /// or starting the download fails.
    pub fn export(&self) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .export()
            .map(|artifact| artifact.is_some())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_preview() {
        let document = crate::dom::document().unwrap();
        if document.get_element_by_id("preview-image").is_none() {
            let img = document.create_element("img").unwrap();
            img.set_id("preview-image");
            document.body().unwrap().append_child(&img).unwrap();
        }
    }

    #[wasm_bindgen_test]
    fn test_export_without_image() {
        mount_preview();
        let editor = Editor::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
        assert!(!editor.is_editing());
        assert_eq!(editor.export().unwrap(), false);
    }

    #[wasm_bindgen_test]
    fn test_controls_inert_before_upload() {
        mount_preview();
        let editor = Editor::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
        assert_eq!(editor.set_parameter("brightness", 150.0).unwrap(), false);
        assert!(editor.filter_state().is_default());
    }

    #[wasm_bindgen_test]
    fn test_unknown_parameter_throws() {
        mount_preview();
        let editor = Editor::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
        assert!(editor.set_parameter("gamma", 1.0).is_err());
        assert!(editor.apply_preset("noir").is_err());
    }

    #[wasm_bindgen_test]
    fn test_garbage_bytes_rejected() {
        mount_preview();
        let editor = Editor::new(JsValue::UNDEFINED, JsValue::UNDEFINED).unwrap();
        let result = editor.load_bytes("x.png".into(), "image/png".into(), vec![1, 2, 3]);
        assert!(result.is_err());
        assert!(!editor.is_editing());
    }
}
