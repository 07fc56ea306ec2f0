//! Integration tests: drive a session through whole upload flows against
//! a recording view, delivering transfer outcomes in chosen orders.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use lookalike_core::transfer::{CONNECTIVITY_MESSAGE, interpret_response};
use lookalike_core::{
    Effect, Event, MatchResult, SessionError, Session, State, TransferOutcome, TransferRequest,
    UploadFile, View,
};

/// Every view call, in order.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Idle,
    Preview(String),
    Loading,
    Result(MatchResult),
    Error(SessionError),
    Notice(String),
}

#[derive(Default)]
struct RecordingView {
    calls: Vec<Call>,
}

impl View for RecordingView {
    fn render_idle(&mut self) {
        self.calls.push(Call::Idle);
    }

    fn render_preview(&mut self, file: &UploadFile) {
        self.calls.push(Call::Preview(file.name().to_owned()));
    }

    fn render_loading(&mut self) {
        self.calls.push(Call::Loading);
    }

    fn render_result(&mut self, result: &MatchResult) {
        self.calls.push(Call::Result(result.clone()));
    }

    fn render_error(&mut self, error: &SessionError) {
        self.calls.push(Call::Error(error.clone()));
    }

    fn render_notice(&mut self, message: &str) {
        self.calls.push(Call::Notice(message.to_owned()));
    }
}

/// A session wired to a recording view; transfer requests are queued
/// rather than run so tests decide when and in which order they settle.
#[derive(Default)]
struct Harness {
    session: Session,
    view: RecordingView,
    pending: Vec<TransferRequest>,
}

impl Harness {
    fn send(&mut self, event: Event) {
        for effect in self.session.handle(event) {
            match effect {
                Effect::Render(render) => render.apply(&mut self.view),
                Effect::Submit(request) => self.pending.push(request),
            }
        }
    }

    fn take_request(&mut self) -> TransferRequest {
        assert!(!self.pending.is_empty(), "no transfer was requested");
        self.pending.remove(0)
    }

    fn settle(&mut self, request: &TransferRequest, outcome: TransferOutcome) {
        self.send(Event::TransferSettled {
            token: request.token,
            outcome,
        });
    }

    fn calls_since(&self, start: usize) -> &[Call] {
        &self.view.calls[start..]
    }
}

fn jpeg(name: &str, size: usize) -> UploadFile {
    UploadFile::new(name, "image/jpeg", vec![0xFFu8; size])
}

#[test]
fn stale_response_is_suppressed() {
    let mut h = Harness::default();

    h.send(Event::FileChosen(jpeg("a.jpg", 64)));
    let a = h.take_request();
    h.send(Event::FileChosen(jpeg("b.jpg", 64)));
    let b = h.take_request();
    assert_eq!(a.token.get(), 1);
    assert_eq!(b.token.get(), 2);

    // B resolves first, then A's late answer arrives.
    h.settle(
        &b,
        interpret_response(200, r#"{"success": true, "matched_image_url": "http://h/x_2.jpg"}"#),
    );
    let before_a = h.view.calls.len();
    h.settle(
        &a,
        interpret_response(200, r#"{"success": true, "matched_image_url": "http://h/x_1.jpg"}"#),
    );

    assert!(h.calls_since(before_a).is_empty(), "A produced a render");
    assert_eq!(h.session.state(), State::Succeeded);
    assert_eq!(h.session.result().unwrap().match_label(), "2");
    assert_eq!(h.session.file().unwrap().name(), "b.jpg");
}

#[test]
fn stale_error_does_not_overwrite_newer_in_flight_submission() {
    let mut h = Harness::default();

    h.send(Event::FileChosen(jpeg("a.jpg", 64)));
    let a = h.take_request();
    h.send(Event::FileChosen(jpeg("b.jpg", 64)));
    let b = h.take_request();

    let before = h.view.calls.len();
    h.settle(&a, TransferOutcome::transport_failure("reset by peer"));
    assert!(h.calls_since(before).is_empty());
    assert_eq!(h.session.state(), State::Submitting);

    h.settle(
        &b,
        TransferOutcome::Success(MatchResult::new("http://h/y_9.jpg", None, None)),
    );
    assert_eq!(h.session.state(), State::Succeeded);
}

#[test]
fn end_to_end_success() {
    let mut h = Harness::default();

    h.send(Event::FileChosen(jpeg("selfie.jpg", 2 * 1024 * 1024)));
    let request = h.take_request();
    assert_eq!(request.file.size(), 2 * 1024 * 1024);

    h.settle(
        &request,
        TransferOutcome::Success(MatchResult::new(
            "http://host/static/db/face_7.png",
            Some(83.0),
            Some("nice try".into()),
        )),
    );

    assert_eq!(h.session.state(), State::Succeeded);
    let Some(Call::Result(result)) = h.view.calls.last() else {
        panic!("expected a result render, got {:?}", h.view.calls);
    };
    assert_eq!(result.confidence(), Some(83.0));
    assert_eq!(result.confidence_text().as_deref(), Some("83%"));
    assert_eq!(result.roast_message(), Some("nice try"));
    assert_eq!(result.match_label(), "7");
    assert_eq!(
        h.view.calls,
        vec![
            Call::Preview("selfie.jpg".into()),
            Call::Loading,
            Call::Result(result.clone()),
        ]
    );
}

#[test]
fn end_to_end_service_rejection() {
    let mut h = Harness::default();

    h.send(Event::FileChosen(jpeg("selfie.jpg", 1024)));
    let request = h.take_request();
    h.settle(
        &request,
        interpret_response(200, r#"{"success": false, "error": "no match found"}"#),
    );

    assert_eq!(h.session.state(), State::Failed);
    assert_eq!(
        h.view.calls.last(),
        Some(&Call::Error(SessionError::Service("no match found".into())))
    );
    assert_eq!(h.session.error().unwrap().to_string(), "no match found");
}

#[test]
fn end_to_end_transport_failure() {
    let mut h = Harness::default();

    h.send(Event::FileChosen(jpeg("selfie.jpg", 1024)));
    let request = h.take_request();
    h.settle(
        &request,
        TransferOutcome::transport_failure("TypeError: Failed to fetch"),
    );

    assert_eq!(h.session.state(), State::Failed);
    let error = h.session.error().unwrap();
    assert!(error.is_transport());
    assert_eq!(error.to_string(), CONNECTIVITY_MESSAGE);
    assert_ne!(error.to_string(), "no match found");
    // The file stays selected so the user can try again.
    assert_eq!(h.session.file().unwrap().name(), "selfie.jpg");
}

#[test]
fn failed_submission_can_be_resubmitted() {
    let mut h = Harness::default();

    h.send(Event::FileChosen(jpeg("selfie.jpg", 1024)));
    let first = h.take_request();
    h.settle(&first, interpret_response(503, ""));
    assert_eq!(h.session.state(), State::Failed);

    h.send(Event::Resubmit);
    let second = h.take_request();
    assert_eq!(second.file, first.file);
    h.settle(
        &second,
        interpret_response(
            200,
            r#"{"success": true, "matched_image_url": "http://h/a_3.jpg", "confidence": 41}"#,
        ),
    );
    assert_eq!(h.session.state(), State::Succeeded);
}

#[test]
fn clear_twice_from_every_state() {
    for name in ["idle", "submitting", "succeeded", "failed"] {
        let mut h = Harness::default();
        match name {
            "submitting" => h.send(Event::FileChosen(jpeg("s.jpg", 8))),
            "succeeded" => {
                h.send(Event::FileChosen(jpeg("s.jpg", 8)));
                let r = h.take_request();
                h.settle(
                    &r,
                    TransferOutcome::Success(MatchResult::new("http://h/a_1.jpg", None, None)),
                );
            }
            "failed" => {
                h.send(Event::FileChosen(jpeg("s.jpg", 8)));
                let r = h.take_request();
                h.settle(&r, TransferOutcome::ServiceError("nope".into()));
            }
            _ => {}
        }
        let was_idle = h.session.state() == State::Idle;

        let before = h.view.calls.len();
        h.send(Event::Clear);
        assert_eq!(h.session.state(), State::Idle, "{name}: first clear");
        let after_first = h.view.calls.len();
        h.send(Event::Clear);
        assert_eq!(h.session.state(), State::Idle, "{name}: second clear");

        let expected_first: &[Call] = if was_idle { &[] } else { &[Call::Idle] };
        assert_eq!(&h.view.calls[before..after_first], expected_first, "{name}");
        assert_eq!(h.view.calls.len(), after_first, "{name}: duplicate render");
        assert!(h.session.file().is_none(), "{name}");
    }
}

#[test]
fn share_is_a_notice_only() {
    let mut h = Harness::default();
    h.send(Event::FileChosen(jpeg("s.jpg", 8)));
    let r = h.take_request();
    h.settle(
        &r,
        TransferOutcome::Success(MatchResult::new("http://h/a_1.jpg", Some(12.0), None)),
    );

    h.send(Event::Share);
    assert_eq!(
        h.view.calls.last(),
        Some(&Call::Notice("Sharing feature coming soon!".into()))
    );
    assert_eq!(h.session.state(), State::Succeeded);
    assert!(h.pending.is_empty());
}

#[test]
fn oversized_file_never_reaches_the_network() {
    let mut h = Harness::default();
    h.send(Event::FileChosen(jpeg("huge.jpg", 10 * 1024 * 1024 + 1)));

    assert!(h.pending.is_empty());
    assert_eq!(h.session.state(), State::Idle);
    let Some(Call::Error(error)) = h.view.calls.last() else {
        panic!("expected an error render");
    };
    assert_eq!(error.to_string(), "file too large");
}
