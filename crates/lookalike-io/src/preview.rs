//! Preview rendering: turn an uploaded file into something an `<img>`
//! can display.
//!
//! In the browser this is a Blob URL created from the file's bytes.
//! The URL must be revoked when the preview is replaced or cleared,
//! which [`crate::view::ViewModel`] takes care of through the
//! [`PreviewRenderer`] trait.

use lookalike_core::UploadFile;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur while creating a preview.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for PreviewError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Produces displayable previews and releases them when done.
pub trait PreviewRenderer {
    /// Create a preview for `file`, returning a URL usable as `<img src>`.
    ///
    /// # Errors
    ///
    /// Returns [`PreviewError`] if the preview cannot be created.
    fn create(&mut self, file: &UploadFile) -> Result<String, PreviewError>;

    /// Release a URL previously returned by [`create`](Self::create).
    fn release(&mut self, url: &str);
}

/// [`PreviewRenderer`] backed by browser Blob URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlobPreviews;

impl PreviewRenderer for BlobPreviews {
    fn create(&mut self, file: &UploadFile) -> Result<String, PreviewError> {
        bytes_to_blob_url(file.bytes(), file.mime_type())
    }

    fn release(&mut self, url: &str) {
        revoke_blob_url(url);
    }
}

/// Wrap raw bytes in a Blob of the given MIME type and return an object
/// URL for it.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`PreviewError::JsError`] if Blob or URL creation fails.
pub fn bytes_to_blob_url(bytes: &[u8], mime_type: &str) -> Result<String, PreviewError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    Ok(url)
}

/// Revoke a Blob URL previously created by [`bytes_to_blob_url`].
///
/// Best-effort: the URL may already have been revoked.
pub fn revoke_blob_url(url: &str) {
    if let Err(e) = web_sys::Url::revoke_object_url(url) {
        tracing::warn!(url, error = ?e, "failed to revoke preview URL");
    }
}
