//! lookalike-core: the upload-and-result state machine (sans-IO).
//!
//! A user picks an image, the client validates it, uploads it to the
//! matching service, and shows the returned doppelgänger. This crate
//! holds every decision in that flow:
//!
//! - [`validate`] gates files by MIME type and size,
//! - [`transfer::interpret_response`] turns the service's reply into a
//!   typed [`TransferOutcome`],
//! - [`label::match_label`] derives the label shown for a match,
//! - [`Session`] sequences it all and emits [`Effect`]s for a [`View`].
//!
//! This crate has **no I/O dependencies**. Browser `fetch`, Blob URLs
//! and Dioxus components live in `lookalike-io`; the native client
//! lives in `lookalike-cli`.

pub mod label;
pub mod session;
pub mod transfer;
pub mod types;
pub mod validate;

pub use session::{Effect, Event, Render, Session, State, TransferRequest, View};
pub use transfer::{TransferOutcome, interpret_response};
pub use types::{
    ClientConfig, MatchResult, RequestToken, SessionError, UploadFile, ValidationError,
};
pub use validate::{FileDescriptor, MAX_UPLOAD_BYTES, ValidationOutcome, validate};
