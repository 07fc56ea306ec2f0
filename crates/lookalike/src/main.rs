use dioxus::prelude::*;
use lookalike_core::{Effect, Event, Session, State, UploadFile, ValidationError};
use lookalike_io::{AlertBanner, FetchTransfer, FileUpload, Results, ViewModel, analytics};

fn main() {
    dioxus::launch(app);
}

/// Signals shared by every handler.
///
/// The session owns the upload state machine; the view model is what
/// the components display.
#[derive(Clone, Copy)]
struct Handles {
    session: Signal<Session>,
    view: Signal<ViewModel>,
}

/// Feed one event to the session and carry out the effects it returns.
///
/// Renders update the view model in order. A submit spawns the upload
/// and, once it settles, feeds the outcome back in with the token it was
/// issued under; the session ignores it if a newer submission or a clear
/// came first.
fn dispatch(mut handles: Handles, event: Event) {
    let effects = handles.session.write().handle(event);
    for effect in effects {
        match effect {
            Effect::Render(render) => render.apply(&mut *handles.view.write()),
            Effect::Submit(request) => {
                let endpoint = handles.session.peek().config().endpoint.clone();
                spawn(async move {
                    let outcome = FetchTransfer::new(endpoint).submit(&request.file).await;
                    analytics::track_outcome(&outcome);
                    dispatch(
                        handles,
                        Event::TransferSettled {
                            token: request.token,
                            outcome,
                        },
                    );
                });
            }
        }
    }
}

/// A button under the upload zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadAction {
    /// Submit the retained file again.
    Resubmit,
    /// Drop the failed attempt and return to the empty page.
    StartOver,
    /// Drop the selection.
    Clear,
}

impl UploadAction {
    const fn label(self) -> &'static str {
        match self {
            Self::Resubmit => "Try again",
            Self::StartOver => "Start over",
            Self::Clear => "Clear",
        }
    }

    const fn class(self) -> &'static str {
        match self {
            Self::Resubmit | Self::StartOver => "btn btn-primary",
            Self::Clear => "btn btn-secondary",
        }
    }

    fn event(self) -> Event {
        match self {
            Self::Resubmit => Event::Resubmit,
            Self::StartOver => Event::Retry,
            Self::Clear => Event::Clear,
        }
    }
}

/// Buttons offered under the upload zone.
///
/// Clear only appears while a file is selected; a failed submission
/// offers a resubmit or a fresh start instead.
const fn upload_actions(state: State, has_file: bool) -> &'static [UploadAction] {
    match state {
        State::Failed => &[UploadAction::Resubmit, UploadAction::StartOver],
        _ if has_file => &[UploadAction::Clear],
        _ => &[],
    }
}

/// Root application component.
///
/// Wires the upload zone, the alert banner, and the results panel to the
/// session through [`dispatch`].
fn app() -> Element {
    let session = use_signal(Session::default);
    let mut view = use_signal(ViewModel::default);
    let handles = Handles { session, view };

    let on_file = move |file: UploadFile| dispatch(handles, Event::FileChosen(file));
    let on_rejected =
        move |reason: ValidationError| dispatch(handles, Event::FileRejected(reason));
    let on_read_error = move |message: String| view.write().report_local_error(message);
    let on_retry = move |()| dispatch(handles, Event::Retry);
    let on_share = move |()| {
        analytics::track_share();
        dispatch(handles, Event::Share);
    };
    let on_dismiss = move |()| view.write().dismiss_alert();

    let state = session.read().state();
    let delay_ms = session.read().config().confidence_animation_delay_ms;
    let max_upload_bytes = session.read().config().max_upload_bytes;
    let model = view.read();
    let preview_url = model.preview_url().map(str::to_owned);
    let buttons: Vec<_> = upload_actions(state, model.has_file())
        .iter()
        .map(|&action| (action, action.label(), action.class()))
        .collect();
    let picker_key = model.picker_generation();
    let panel = model.results().clone();
    let alert = model.alert().cloned();
    drop(model);

    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "page",
            header { class: "page-header",
                h1 { "Find your doppelgänger" }
                p { class: "tagline",
                    "Upload a selfie and we'll find the face in our database that looks most like you"
                }
            }

            if let Some(alert) = alert {
                AlertBanner { alert, on_dismiss }
            }

            main { class: "columns",
                section { class: "card",
                    FileUpload {
                        on_file,
                        on_rejected,
                        on_read_error,
                        preview_url,
                        max_upload_bytes,
                        picker_key,
                    }

                    div { class: "upload-actions",
                        for (action, label, class) in buttons {
                            button {
                                key: "{label}",
                                class: "{class}",
                                onclick: move |_| dispatch(handles, action.event()),
                                "{label}"
                            }
                        }
                    }
                }

                section { class: "card",
                    Results {
                        panel,
                        animation_delay_ms: delay_ms,
                        on_share,
                        on_retry,
                    }
                }
            }
        }
    }
}
