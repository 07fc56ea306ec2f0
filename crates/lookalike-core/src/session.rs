//! The upload-and-result state machine.
//!
//! [`Session`] owns the one live upload. Callers feed it [`Event`]s in
//! arrival order and receive the [`Effect`]s to carry out: render
//! commands for a [`View`], and transfer requests to run. The session
//! never performs I/O itself, so it can be driven identically by the
//! browser app, the native client, and tests.
//!
//! ```text
//!   Idle ──file──▶ PreviewReady ──▶ Submitting ──ok──▶ Succeeded
//!    ▲                                  │    └──err──▶ Failed
//!    └───────────── clear / retry ──────┴──────────────────┘
//! ```
//!
//! Stale outcomes are dropped by comparing each outcome's
//! [`RequestToken`] with the token of the submission in flight.

use std::fmt;

use crate::transfer::TransferOutcome;
use crate::types::{
    ClientConfig, MatchResult, RequestToken, SessionError, UploadFile, ValidationError,
};
use crate::validate;

/// Observable state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// No file selected.
    Idle,
    /// A file was accepted and its preview shown.
    PreviewReady,
    /// A transfer is in flight for the current token.
    Submitting,
    /// The last submission produced a match.
    Succeeded,
    /// The last submission failed; the file is kept.
    Failed,
}

impl State {
    /// Human-readable name for logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PreviewReady => "preview-ready",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// The user picked or dropped a file.
    FileChosen(UploadFile),
    /// A picked file was refused from its declared type and size,
    /// before its contents were read.
    FileRejected(ValidationError),
    /// The user asked to submit the retained file again.
    Resubmit,
    /// A transfer finished.
    TransferSettled {
        /// Token of the submission that produced `outcome`.
        token: RequestToken,
        /// What the transfer client reported.
        outcome: TransferOutcome,
    },
    /// The user cleared the selection.
    Clear,
    /// The user pressed "try another" on a finished result.
    Retry,
    /// The user pressed share.
    Share,
}

impl Event {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FileChosen(_) => "file-chosen",
            Self::FileRejected(_) => "file-rejected",
            Self::Resubmit => "resubmit",
            Self::TransferSettled { .. } => "transfer-settled",
            Self::Clear => "clear",
            Self::Retry => "retry",
            Self::Share => "share",
        }
    }
}

/// A render command for the [`View`].
#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    /// Placeholder everywhere: no preview, no result.
    Idle,
    /// Show the chosen file as a preview.
    Preview(UploadFile),
    /// Show the loading indicator in the results panel.
    Loading,
    /// Show a match.
    Result(MatchResult),
    /// Show an error message.
    Error(SessionError),
    /// Show a transient acknowledgment.
    Notice(String),
}

impl Render {
    /// Dispatch this command to the matching [`View`] method.
    pub fn apply<V: View + ?Sized>(&self, view: &mut V) {
        match self {
            Self::Idle => view.render_idle(),
            Self::Preview(file) => view.render_preview(file),
            Self::Loading => view.render_loading(),
            Self::Result(result) => view.render_result(result),
            Self::Error(error) => view.render_error(error),
            Self::Notice(message) => view.render_notice(message),
        }
    }
}

/// A request to run one transfer.
///
/// The caller submits `file` and reports back with
/// [`Event::TransferSettled`] carrying the same `token`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Token identifying this submission.
    pub token: RequestToken,
    /// The file to upload.
    pub file: UploadFile,
}

/// Something the caller must do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Update the view.
    Render(Render),
    /// Start a transfer.
    Submit(TransferRequest),
}

/// The rendering side of the upload flow.
///
/// Calls are one-way; the session never waits on a view.
pub trait View {
    /// Reset to the initial placeholder layout.
    fn render_idle(&mut self);

    /// Show the chosen file.
    fn render_preview(&mut self, file: &UploadFile);

    /// Show that a submission is in progress.
    fn render_loading(&mut self);

    /// Show a match.
    fn render_result(&mut self, result: &MatchResult);

    /// Show an error.
    ///
    /// Validation errors leave the rest of the view as it is. Service
    /// and transport errors also return the results panel to its
    /// placeholder while keeping the preview.
    fn render_error(&mut self, error: &SessionError);

    /// Show a transient acknowledgment.
    fn render_notice(&mut self, message: &str);
}

/// Internal state, carrying the data each state requires.
#[derive(Debug, Clone)]
enum Phase {
    Idle,
    PreviewReady { file: UploadFile },
    Submitting { file: UploadFile },
    Succeeded { file: UploadFile, result: MatchResult },
    Failed { file: UploadFile, error: SessionError },
}

/// The single live upload.
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    token: RequestToken,
    config: ClientConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Session {
    /// Create an idle session.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self {
            phase: Phase::Idle,
            token: RequestToken::INITIAL,
            config,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> State {
        match self.phase {
            Phase::Idle => State::Idle,
            Phase::PreviewReady { .. } => State::PreviewReady,
            Phase::Submitting { .. } => State::Submitting,
            Phase::Succeeded { .. } => State::Succeeded,
            Phase::Failed { .. } => State::Failed,
        }
    }

    /// The accepted file; `None` only when idle.
    #[must_use]
    pub const fn file(&self) -> Option<&UploadFile> {
        match &self.phase {
            Phase::Idle => None,
            Phase::PreviewReady { file }
            | Phase::Submitting { file }
            | Phase::Succeeded { file, .. }
            | Phase::Failed { file, .. } => Some(file),
        }
    }

    /// Token of the most recently started submission.
    #[must_use]
    pub const fn token(&self) -> RequestToken {
        self.token
    }

    /// The match, when the last submission succeeded.
    #[must_use]
    pub const fn result(&self) -> Option<&MatchResult> {
        match &self.phase {
            Phase::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The failure, when the last submission failed.
    #[must_use]
    pub const fn error(&self) -> Option<&SessionError> {
        match &self.phase {
            Phase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The configuration this session validates against.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Apply one event and return the effects to carry out, in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        tracing::debug!(
            state = %self.state(),
            token = self.token.get(),
            event = event.kind(),
            "handling event"
        );

        let mut effects = Vec::new();
        match event {
            Event::FileChosen(file) => self.choose_file(file, &mut effects),
            Event::FileRejected(reason) => {
                tracing::warn!(%reason, "file rejected before reading");
                effects.push(Effect::Render(Render::Error(reason.into())));
            }
            Event::Resubmit => self.resubmit(&mut effects),
            Event::TransferSettled { token, outcome } => self.settle(token, outcome, &mut effects),
            Event::Clear => self.clear(&mut effects),
            Event::Retry => self.retry(&mut effects),
            Event::Share => {
                effects.push(Effect::Render(Render::Notice(self.config.share_notice.clone())));
            }
        }
        effects
    }

    fn choose_file(&mut self, file: UploadFile, effects: &mut Vec<Effect>) {
        if let Err(reason) =
            validate::validate_with_limit(&file.descriptor(), self.config.max_upload_bytes)
        {
            tracing::warn!(
                name = file.name(),
                mime_type = file.mime_type(),
                size = file.size(),
                %reason,
                "file rejected"
            );
            effects.push(Effect::Render(Render::Error(reason.into())));
            return;
        }

        if matches!(self.phase, Phase::Submitting { .. }) {
            tracing::debug!(
                superseded = self.token.get(),
                "new file supersedes the submission in flight"
            );
        }

        effects.push(Effect::Render(Render::Preview(file.clone())));
        self.phase = Phase::PreviewReady { file };
        self.begin_submission(effects);
    }

    fn resubmit(&mut self, effects: &mut Vec<Effect>) {
        match self.phase {
            Phase::PreviewReady { .. } | Phase::Failed { .. } => self.begin_submission(effects),
            _ => tracing::debug!(state = %self.state(), "nothing to resubmit"),
        }
    }

    /// Move from `PreviewReady` or `Failed` to `Submitting` under a
    /// fresh token.
    fn begin_submission(&mut self, effects: &mut Vec<Effect>) {
        let file = match &self.phase {
            Phase::PreviewReady { file } | Phase::Failed { file, .. } => file.clone(),
            _ => return,
        };

        self.token = self.token.next();
        tracing::debug!(token = self.token.get(), name = file.name(), "submission started");

        effects.push(Effect::Render(Render::Loading));
        effects.push(Effect::Submit(TransferRequest {
            token: self.token,
            file: file.clone(),
        }));
        self.phase = Phase::Submitting { file };
    }

    fn settle(&mut self, token: RequestToken, outcome: TransferOutcome, effects: &mut Vec<Effect>) {
        let file = match &self.phase {
            Phase::Submitting { file } if token == self.token => file.clone(),
            _ => {
                tracing::debug!(
                    outcome_token = token.get(),
                    current_token = self.token.get(),
                    state = %self.state(),
                    "dropping stale transfer outcome"
                );
                return;
            }
        };

        match outcome.into_result() {
            Ok(result) => {
                tracing::info!(
                    token = token.get(),
                    label = result.match_label(),
                    confidence = result.confidence(),
                    "match found"
                );
                effects.push(Effect::Render(Render::Result(result.clone())));
                self.phase = Phase::Succeeded { file, result };
            }
            Err(error) => {
                tracing::warn!(token = token.get(), %error, "submission failed");
                effects.push(Effect::Render(Render::Error(error.clone())));
                self.phase = Phase::Failed { file, error };
            }
        }
    }

    fn clear(&mut self, effects: &mut Vec<Effect>) {
        if matches!(self.phase, Phase::Idle) {
            return;
        }
        self.phase = Phase::Idle;
        effects.push(Effect::Render(Render::Idle));
    }

    fn retry(&mut self, effects: &mut Vec<Effect>) {
        match self.phase {
            Phase::Succeeded { .. } | Phase::Failed { .. } => self.clear(effects),
            _ => tracing::debug!(state = %self.state(), "retry ignored"),
        }
    }
}
