//! Browser transfer client: uploads the image with `fetch`.
//!
//! [`FetchTransfer`] performs the multipart POST and hands the status
//! and body to [`lookalike_core::interpret_response`]; any failure to
//! complete the exchange becomes a transport error. It never retries.

use gloo_net::http::Request;
use lookalike_core::transfer::FILE_FIELD;
use lookalike_core::{TransferOutcome, UploadFile, interpret_response};
use wasm_bindgen::JsValue;
use web_sys::{BlobPropertyBag, FormData};

/// Errors building the request body.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for FormError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Uploads files to the matching endpoint with the Fetch API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTransfer {
    endpoint: String,
}

impl FetchTransfer {
    /// Create a client posting to `endpoint` (a path on the current
    /// origin or an absolute URL).
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload `file` and wait for the service's verdict.
    ///
    /// Never fails: every problem is folded into the returned
    /// [`TransferOutcome`].
    #[allow(clippy::future_not_send)] // WASM is single-threaded; JS values are !Send
    pub async fn submit(&self, file: &UploadFile) -> TransferOutcome {
        let form = match build_form(file) {
            Ok(form) => form,
            Err(e) => return TransferOutcome::transport_failure(e),
        };

        let request = match Request::post(&self.endpoint).body(form) {
            Ok(request) => request,
            Err(e) => return TransferOutcome::transport_failure(e),
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            name = file.name(),
            size = file.size(),
            "posting image"
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return TransferOutcome::transport_failure(e),
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => interpret_response(status, &body),
            // A failure status already decides the outcome; the body
            // only refines the message.
            Err(e) if !response.ok() => {
                tracing::debug!(status, error = %e, "failed to read error body");
                interpret_response(status, "")
            }
            Err(e) => TransferOutcome::transport_failure(e),
        }
    }
}

/// Build the multipart body: one `file` part with the image bytes, its
/// declared content type, and its filename.
fn build_form(file: &UploadFile) -> Result<FormData, FormError> {
    let uint8_array = js_sys::Uint8Array::from(file.bytes());
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(file.mime_type());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename(FILE_FIELD, &blob, file.name())?;
    Ok(form)
}
