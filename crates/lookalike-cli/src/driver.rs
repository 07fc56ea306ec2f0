//! Runs one upload through the session and prints what it renders.

use std::collections::VecDeque;
use std::io::Write;

use lookalike_core::{
    Effect, Event, MatchResult, Render, Session, SessionError, UploadFile, View,
};

use crate::transport::Transport;

/// Feed `file` to `session`, performing each requested transfer with
/// `transport`, until no events remain.
///
/// Returns the match on success.
///
/// # Errors
///
/// Returns the [`SessionError`] the session rendered last: a rejected
/// file, a service refusal, or a transport failure.
pub async fn run<T, V>(
    session: &mut Session,
    transport: &T,
    view: &mut V,
    file: UploadFile,
) -> Result<MatchResult, SessionError>
where
    T: Transport,
    V: View,
{
    let mut queue = VecDeque::from([Event::FileChosen(file)]);
    let mut last_error = None;

    while let Some(event) = queue.pop_front() {
        for effect in session.handle(event) {
            match effect {
                Effect::Render(render) => {
                    if let Render::Error(error) = &render {
                        last_error = Some(error.clone());
                    }
                    render.apply(view);
                }
                Effect::Submit(request) => {
                    let outcome = transport.send(&request.file).await;
                    queue.push_back(Event::TransferSettled {
                        token: request.token,
                        outcome,
                    });
                }
            }
        }
    }

    match (session.result(), last_error) {
        (Some(result), _) => Ok(result.clone()),
        (None, Some(error)) => Err(error),
        // The loop only ends without either after a clear, which this
        // driver never sends.
        (None, None) => Err(SessionError::Transport(
            "submission ended without an outcome".to_owned(),
        )),
    }
}

/// Prints progress to one writer and the match card to another.
#[derive(Debug)]
pub struct TerminalView<O, E> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> TerminalView<O, E> {
    /// Print results to `out` and progress and errors to `err`.
    pub const fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    fn progress(&mut self, line: &str) {
        if let Err(e) = writeln!(self.err, "{line}") {
            tracing::warn!(error = %e, "failed to write progress");
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// Human-readable size, e.g. `2.0 MB`.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < KB * KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{:.1} MB", bytes / (KB * KB))
    }
}

/// The match card as printed lines.
fn card_lines(result: &MatchResult) -> Vec<String> {
    let mut lines = vec![
        result.display_name(),
        MatchResult::SUBTITLE.to_owned(),
    ];
    if let Some(confidence) = result.confidence_text() {
        lines.push(format!("Confidence: {confidence}"));
    }
    if let Some(roast) = result.roast_message() {
        lines.push(format!("\"{roast}\""));
    }
    lines.push(format!("Image: {}", result.image_url()));
    lines
}

impl<O: Write, E: Write> View for TerminalView<O, E> {
    fn render_idle(&mut self) {}

    fn render_preview(&mut self, file: &UploadFile) {
        let line = format!(
            "Selected {} ({}, {})",
            file.name(),
            format_size(file.size()),
            file.mime_type()
        );
        self.progress(&line);
    }

    fn render_loading(&mut self) {
        self.progress("Searching the database...");
    }

    fn render_result(&mut self, result: &MatchResult) {
        for line in card_lines(result) {
            if let Err(e) = writeln!(self.out, "{line}") {
                tracing::warn!(error = %e, "failed to write result");
                return;
            }
        }
    }

    fn render_error(&mut self, error: &SessionError) {
        self.progress(&format!("Error: {error}"));
    }

    fn render_notice(&mut self, message: &str) {
        self.progress(message);
    }
}
