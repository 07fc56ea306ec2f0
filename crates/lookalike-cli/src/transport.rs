//! Multipart upload over `reqwest`.

use lookalike_core::transfer::FILE_FIELD;
use lookalike_core::{TransferOutcome, UploadFile, interpret_response};
use reqwest::multipart::{Form, Part};

/// Carries one upload to the matching service.
pub trait Transport {
    /// Upload `file` and report how the exchange ended.
    async fn send(&self, file: &UploadFile) -> TransferOutcome;
}

/// [`Transport`] posting to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport posting to `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lookalike-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, file: &UploadFile) -> TransferOutcome {
        let part = match Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_owned())
            .mime_str(file.mime_type())
        {
            Ok(part) => part,
            Err(e) => return TransferOutcome::transport_failure(e),
        };
        let form = Form::new().part(FILE_FIELD, part);

        tracing::debug!(url = %self.url, name = file.name(), size = file.size(), "posting image");
        let response = match self.client.post(&self.url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => return TransferOutcome::transport_failure(e),
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => interpret_response(status.as_u16(), &body),
            Err(e) if !status.is_success() => {
                tracing::debug!(%status, error = %e, "failed to read error body");
                interpret_response(status.as_u16(), "")
            }
            Err(e) => TransferOutcome::transport_failure(e),
        }
    }
}
