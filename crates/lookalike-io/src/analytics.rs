//! Outcome counters for the matching flow.
//!
//! Events go to an `sa_event(name)` function that the hosting page may
//! define on the global object. Pages without it get no tracking and no
//! errors.

use js_sys::{Function, Reflect};
use lookalike_core::TransferOutcome;
use wasm_bindgen::{JsCast, JsValue};

/// Global hook the page provides.
const HOOK: &str = "sa_event";

/// Whether `name` is lowercase ASCII, digits and underscores, at most
/// 200 bytes long.
fn is_valid_event_name(name: &str) -> bool {
    name.len() <= 200
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
}

fn emit(name: &str) {
    debug_assert!(is_valid_event_name(name), "bad event name {name:?}");
    let hook = Reflect::get(&js_sys::global(), &JsValue::from_str(HOOK))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok());
    if let Some(hook) = hook
        && let Err(e) = hook.call1(&JsValue::NULL, &JsValue::from_str(name))
    {
        tracing::debug!(event = name, error = ?e, "analytics hook failed");
    }
}

/// Event name recorded for a settled transfer.
#[must_use]
pub const fn outcome_event(outcome: &TransferOutcome) -> &'static str {
    match outcome {
        TransferOutcome::Success(_) => "match_success",
        TransferOutcome::ServiceError(_) => "match_service_error",
        TransferOutcome::TransportError(_) => "match_transport_error",
    }
}

/// Record how a submission ended.
pub fn track_outcome(outcome: &TransferOutcome) {
    emit(outcome_event(outcome));
}

/// Record a press of the share button.
pub fn track_share() {
    emit("share_clicked");
}
