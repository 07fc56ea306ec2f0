//! The matching service's wire contract and the interpretation of its
//! replies.
//!
//! The actual HTTP exchange lives with the caller (`fetch` in the
//! browser, `reqwest` natively). Whatever performs it hands the status
//! code and body text to [`interpret_response`], or reports a failed
//! exchange through [`TransferOutcome::transport_failure`], so every
//! transport produces the same typed [`TransferOutcome`].

use serde::Deserialize;

use crate::types::{MatchResult, SessionError};

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Message shown when the service cannot be reached.
pub const CONNECTIVITY_MESSAGE: &str = "Cannot connect to the AI server. Please try again later.";

/// Message shown when the service replied with something unreadable.
pub const MALFORMED_RESPONSE_MESSAGE: &str =
    "The AI server sent an unreadable response. Please try again later.";

/// Message shown when the service failed without saying why.
pub const GENERIC_SERVICE_MESSAGE: &str = "An unknown server error occurred.";

/// How one submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutcome {
    /// The service found a match.
    Success(MatchResult),
    /// The service was reached but reported a failure.
    ServiceError(String),
    /// The service could not be reached or its reply was unreadable.
    TransportError(String),
}

impl TransferOutcome {
    /// Outcome for an exchange that failed below the HTTP layer
    /// (connection refused, DNS, CORS, aborted body read).
    ///
    /// The technical detail is logged; the outcome carries the
    /// user-facing connectivity message.
    pub fn transport_failure(detail: impl std::fmt::Display) -> Self {
        tracing::warn!(%detail, "transfer failed before a response was read");
        Self::TransportError(CONNECTIVITY_MESSAGE.to_owned())
    }

    /// Split into the match or the error the view should show.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Service`] or [`SessionError::Transport`]
    /// for the corresponding failure variants.
    pub fn into_result(self) -> Result<MatchResult, SessionError> {
        match self {
            Self::Success(result) => Ok(result),
            Self::ServiceError(message) => Err(SessionError::Service(message)),
            Self::TransportError(message) => Err(SessionError::Transport(message)),
        }
    }
}

/// JSON body returned by the matching endpoint.
///
/// All fields are optional on the wire; which ones are required
/// depends on `success` and is checked in [`interpret_response`].
#[derive(Debug, Default, Deserialize)]
struct MatchResponse {
    #[serde(default)]
    success: bool,
    matched_image_url: Option<String>,
    confidence: Option<f64>,
    roast_message: Option<String>,
    error: Option<String>,
}

/// Turn an HTTP status code and body into a [`TransferOutcome`].
///
/// - Non-2xx: [`TransferOutcome::ServiceError`] with the body's `error`
///   field, or [`GENERIC_SERVICE_MESSAGE`] if the body has none or is
///   not JSON.
/// - 2xx with an unparseable body, or `success: true` without
///   `matched_image_url`: [`TransferOutcome::TransportError`].
/// - 2xx with `success` false or missing: [`TransferOutcome::ServiceError`]
///   as for non-2xx.
/// - Otherwise [`TransferOutcome::Success`].
#[must_use]
pub fn interpret_response(status: u16, body: &str) -> TransferOutcome {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<MatchResponse>(body)
            .ok()
            .and_then(|response| response.error);
        tracing::warn!(status, "matching service returned a failure status");
        return service_error(message);
    }

    let response = match serde_json::from_str::<MatchResponse>(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(status, error = %e, "matching service reply is not valid JSON");
            return TransferOutcome::TransportError(MALFORMED_RESPONSE_MESSAGE.to_owned());
        }
    };

    if !response.success {
        return service_error(response.error);
    }

    let Some(image_url) = response.matched_image_url else {
        tracing::warn!("successful reply is missing matched_image_url");
        return TransferOutcome::TransportError(MALFORMED_RESPONSE_MESSAGE.to_owned());
    };

    TransferOutcome::Success(MatchResult::new(
        image_url,
        response.confidence,
        response.roast_message,
    ))
}

fn service_error(message: Option<String>) -> TransferOutcome {
    TransferOutcome::ServiceError(
        message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_owned()),
    )
}
