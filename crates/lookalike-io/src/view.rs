//! The render target the app's components read from.
//!
//! [`ViewModel`] implements [`lookalike_core::View`]: the session's
//! render commands update it, and the Dioxus components display
//! whatever it holds. It owns the preview URL and releases it when the
//! preview is replaced or cleared.

use lookalike_core::{MatchResult, SessionError, UploadFile, View};

use crate::preview::{BlobPreviews, PreviewRenderer};

/// What the results panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsPanel {
    /// Nothing submitted yet, or the last submission failed.
    Placeholder,
    /// A submission is in flight.
    Loading,
    /// A match to display.
    Match(MatchResult),
}

/// Category of a banner message; drives its styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// The chosen file was refused locally.
    Invalid,
    /// The service reported a failure.
    Service,
    /// The service could not be reached.
    Connectivity,
    /// A neutral acknowledgment.
    Notice,
}

/// A dismissible banner message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// What kind of message this is.
    pub kind: AlertKind,
    /// Text to show.
    pub message: String,
}

impl Alert {
    fn for_error(error: &SessionError) -> Self {
        let kind = match error {
            SessionError::Validation(_) => AlertKind::Invalid,
            SessionError::Service(_) => AlertKind::Service,
            SessionError::Transport(_) => AlertKind::Connectivity,
        };
        Self {
            kind,
            message: format!("Error: {error}"),
        }
    }

    /// Whether this banner reports a problem.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self.kind, AlertKind::Notice)
    }
}

/// Everything the page displays.
#[derive(Debug)]
pub struct ViewModel<P = BlobPreviews> {
    renderer: P,
    preview_url: Option<String>,
    has_file: bool,
    results: ResultsPanel,
    alert: Option<Alert>,
    picker_generation: u64,
}

impl Default for ViewModel<BlobPreviews> {
    fn default() -> Self {
        Self::new(BlobPreviews)
    }
}

impl<P: PreviewRenderer> ViewModel<P> {
    /// An empty page using `renderer` for previews.
    #[must_use]
    pub const fn new(renderer: P) -> Self {
        Self {
            renderer,
            preview_url: None,
            has_file: false,
            results: ResultsPanel::Placeholder,
            alert: None,
            picker_generation: 0,
        }
    }

    /// URL of the preview image, when one is shown.
    #[must_use]
    pub fn preview_url(&self) -> Option<&str> {
        self.preview_url.as_deref()
    }

    /// Whether a file is selected; the clear control is shown only then.
    #[must_use]
    pub const fn has_file(&self) -> bool {
        self.has_file
    }

    /// Current results panel content.
    #[must_use]
    pub const fn results(&self) -> &ResultsPanel {
        &self.results
    }

    /// Current banner, if any.
    #[must_use]
    pub const fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    /// Changes whenever the file input must be recreated so that picking
    /// the same file again still fires `change`.
    #[must_use]
    pub const fn picker_generation(&self) -> u64 {
        self.picker_generation
    }

    /// Hide the banner.
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Show an error that happened before the session saw the file
    /// (e.g. the browser failed to read it).
    pub fn report_local_error(&mut self, message: impl Into<String>) {
        self.reset_picker();
        self.alert = Some(Alert {
            kind: AlertKind::Invalid,
            message: format!("Error: {}", message.into()),
        });
    }

    const fn reset_picker(&mut self) {
        self.picker_generation = self.picker_generation.wrapping_add(1);
    }

    fn release_preview(&mut self) {
        if let Some(url) = self.preview_url.take() {
            self.renderer.release(&url);
        }
    }
}

impl<P: PreviewRenderer> View for ViewModel<P> {
    fn render_idle(&mut self) {
        self.reset_picker();
        self.release_preview();
        self.has_file = false;
        self.results = ResultsPanel::Placeholder;
        self.alert = None;
    }

    fn render_preview(&mut self, file: &UploadFile) {
        self.reset_picker();
        self.release_preview();
        self.has_file = true;
        self.alert = None;
        match self.renderer.create(file) {
            Ok(url) => self.preview_url = Some(url),
            Err(e) => tracing::warn!(name = file.name(), error = %e, "preview unavailable"),
        }
    }

    fn render_loading(&mut self) {
        self.results = ResultsPanel::Loading;
    }

    fn render_result(&mut self, result: &MatchResult) {
        self.results = ResultsPanel::Match(result.clone());
    }

    fn render_error(&mut self, error: &SessionError) {
        if error.is_validation() {
            self.reset_picker();
        } else {
            self.results = ResultsPanel::Placeholder;
        }
        self.alert = Some(Alert::for_error(error));
    }

    fn render_notice(&mut self, message: &str) {
        self.alert = Some(Alert {
            kind: AlertKind::Notice,
            message: message.to_owned(),
        });
    }
}
