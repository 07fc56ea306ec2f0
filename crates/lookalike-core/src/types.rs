//! Shared types for the lookalike upload flow.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::label;
use crate::validate::FileDescriptor;

/// An image file chosen by the user, with its raw bytes, declared MIME
/// type and declared size.
///
/// Cloning is cheap: the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    name: String,
    mime_type: String,
    size: u64,
    bytes: Arc<[u8]>,
}

impl UploadFile {
    /// Create a new upload file.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Use the size the picker reported instead of the length of the
    /// bytes read.
    #[must_use]
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// The filename as reported by the picker or drop event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared MIME type (e.g. `"image/jpeg"`).
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared size of the file in bytes; the byte length unless the
    /// picker reported one.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// The descriptor the validator inspects.
    #[must_use]
    pub fn descriptor(&self) -> FileDescriptor<'_> {
        FileDescriptor {
            mime_type: &self.mime_type,
            size: self.size(),
        }
    }
}

/// Identifies one submission.
///
/// Every submission gets a strictly greater token than the one before,
/// so comparing tokens tells whether an outcome belongs to the current
/// submission or to one that has since been superseded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The token held before any submission has started.
    pub const INITIAL: Self = Self(0);

    /// The token for the next submission.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The match returned by the service for one submission.
///
/// Immutable once constructed; the label is derived from the image URL
/// at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    image_url: String,
    match_label: String,
    confidence: Option<f64>,
    roast_message: Option<String>,
}

impl MatchResult {
    /// Subtitle shown under the match name.
    pub const SUBTITLE: &str = "From the AI Database";

    /// Build a result from the fields the service returned.
    ///
    /// An empty roast message is treated as absent.
    #[must_use]
    pub fn new(
        image_url: impl Into<String>,
        confidence: Option<f64>,
        roast_message: Option<String>,
    ) -> Self {
        let image_url = image_url.into();
        let match_label = label::match_label(&image_url);
        Self {
            image_url,
            match_label,
            confidence,
            roast_message: roast_message.filter(|m| !m.is_empty()),
        }
    }

    /// URL of the matched image, as provided by the service.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Short identifier derived from the image URL's filename.
    #[must_use]
    pub fn match_label(&self) -> &str {
        &self.match_label
    }

    /// Confidence percentage, if the service reported one.
    #[must_use]
    pub const fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    /// Roast text, if the service supplied a non-empty one.
    #[must_use]
    pub fn roast_message(&self) -> Option<&str> {
        self.roast_message.as_deref()
    }

    /// Headline for the match card, e.g. `"Doppelgänger #42"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("Doppelgänger #{}", self.match_label)
    }

    /// Confidence formatted for display, e.g. `"83%"` or `"83.5%"`.
    #[must_use]
    pub fn confidence_text(&self) -> Option<String> {
        self.confidence.map(|c| {
            if c.fract().abs() < f64::EPSILON {
                format!("{c:.0}%")
            } else {
                format!("{c}%")
            }
        })
    }

    /// Confidence clamped to `0..=100` for sizing a progress bar.
    ///
    /// Missing or non-finite confidence yields `0.0`.
    #[must_use]
    pub fn confidence_bar_percent(&self) -> f64 {
        self.confidence
            .filter(|c| c.is_finite())
            .map_or(0.0, |c| c.clamp(0.0, 100.0))
    }
}

/// Configuration for the upload client.
///
/// Every field has a default, so a partial JSON document (or none at
/// all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path (or absolute URL) of the matching endpoint.
    pub endpoint: String,

    /// Largest accepted upload in bytes.
    pub max_upload_bytes: u64,

    /// Delay before the confidence bar animates to its value, in
    /// milliseconds.
    pub confidence_animation_delay_ms: u32,

    /// Acknowledgment shown when the user asks to share a result.
    pub share_notice: String,
}

impl ClientConfig {
    /// Default matching endpoint.
    pub const DEFAULT_ENDPOINT: &str = "/find-match";

    /// Default upload limit: 10 MiB.
    pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = crate::validate::MAX_UPLOAD_BYTES;

    /// Default confidence bar animation delay.
    pub const DEFAULT_CONFIDENCE_ANIMATION_DELAY_MS: u32 = 100;

    /// Default share acknowledgment.
    pub const DEFAULT_SHARE_NOTICE: &str = "Sharing feature coming soon!";
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
            confidence_animation_delay_ms: Self::DEFAULT_CONFIDENCE_ANIMATION_DELAY_MS,
            share_notice: Self::DEFAULT_SHARE_NOTICE.to_owned(),
        }
    }
}

/// Why a file was refused before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The declared MIME type is not `image/*`.
    #[error("not an image file")]
    NotAnImage,

    /// The file exceeds the upload limit.
    #[error("file too large")]
    TooLarge,
}

/// Errors surfaced to the view.
///
/// Service and transport failures carry user-facing messages; the
/// variants stay distinct so renderers can tell a rejected request from
/// an unreachable server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The chosen file was refused locally.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The service was reached but reported a failure.
    #[error("{0}")]
    Service(String),

    /// The service could not be reached or its reply was unreadable.
    #[error("{0}")]
    Transport(String),
}

impl SessionError {
    /// Whether this error came from the local validator.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the service reported this error.
    #[must_use]
    pub const fn is_service(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Whether this is a connectivity failure.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_strictly() {
        let first = RequestToken::INITIAL.next();
        let second = first.next();
        assert_eq!(first.get(), 1);
        assert!(second > first);
        assert_eq!(second.to_string(), "#2");
    }

    #[test]
    fn upload_file_reports_size_from_bytes() {
        let file = UploadFile::new("me.jpg", "image/jpeg", vec![0u8; 1234]);
        assert_eq!(file.size(), 1234);
        assert_eq!(file.descriptor().mime_type, "image/jpeg");
        assert_eq!(file.descriptor().size, 1234);
    }

    #[test]
    fn declared_size_is_what_the_validator_sees() {
        let file = UploadFile::new("me.jpg", "image/jpeg", vec![0u8; 16])
            .with_declared_size(11 * 1024 * 1024);
        assert_eq!(file.bytes().len(), 16);
        assert_eq!(file.size(), 11 * 1024 * 1024);
        assert_eq!(file.descriptor().size, 11 * 1024 * 1024);
    }

    #[test]
    fn default_limit_matches_validator() {
        assert_eq!(
            ClientConfig::default().max_upload_bytes,
            crate::validate::MAX_UPLOAD_BYTES
        );
    }

    #[test]
    fn upload_file_clone_shares_bytes() {
        let file = UploadFile::new("me.png", "image/png", vec![1u8, 2, 3]);
        let copy = file.clone();
        assert_eq!(file, copy);
        assert!(std::ptr::eq(file.bytes().as_ptr(), copy.bytes().as_ptr()));
    }

    #[test]
    fn match_result_derives_label_and_drops_empty_roast() {
        let result = MatchResult::new(
            "http://host/static/faces/actor_42.jpg",
            Some(83.0),
            Some(String::new()),
        );
        assert_eq!(result.match_label(), "42");
        assert_eq!(result.display_name(), "Doppelgänger #42");
        assert_eq!(result.roast_message(), None);
    }

    #[test]
    fn confidence_text_formats_whole_and_fractional_values() {
        let whole = MatchResult::new("a_1.jpg", Some(83.0), None);
        let fractional = MatchResult::new("a_1.jpg", Some(83.5), None);
        let missing = MatchResult::new("a_1.jpg", None, None);
        assert_eq!(whole.confidence_text().as_deref(), Some("83%"));
        assert_eq!(fractional.confidence_text().as_deref(), Some("83.5%"));
        assert_eq!(missing.confidence_text(), None);
    }

    #[test]
    fn confidence_bar_is_clamped() {
        let bar = |c| MatchResult::new("a_1.jpg", c, None).confidence_bar_percent();
        assert!((bar(Some(140.0)) - 100.0).abs() < f64::EPSILON);
        assert!((bar(Some(42.5)) - 42.5).abs() < f64::EPSILON);
        assert!(bar(Some(-5.0)).abs() < f64::EPSILON);
        assert!(bar(Some(f64::NAN)).abs() < f64::EPSILON);
        assert!(bar(None).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"endpoint": "https://api.example.com/find-match"}"#).unwrap();
        assert_eq!(config.endpoint, "https://api.example.com/find-match");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.confidence_animation_delay_ms, 100);
        assert_eq!(config.share_notice, "Sharing feature coming soon!");
    }

    #[test]
    fn session_error_messages_are_the_user_facing_text() {
        assert_eq!(
            SessionError::from(ValidationError::TooLarge).to_string(),
            "file too large"
        );
        assert_eq!(
            SessionError::Service("no match found".into()).to_string(),
            "no match found"
        );
        assert!(SessionError::Transport("down".into()).is_transport());
        assert!(SessionError::Service("nope".into()).is_service());
        assert!(SessionError::from(ValidationError::NotAnImage).is_validation());
    }
}
