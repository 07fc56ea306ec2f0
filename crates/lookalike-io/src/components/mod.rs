//! Dioxus UI components for lookalike.
//!
//! Provides the upload zone with its preview, the results panel with
//! the match card and animated confidence bar, and the alert banner.

mod alert;
mod confidence;
mod results;
mod upload;

pub use alert::AlertBanner;
pub use confidence::ConfidenceBar;
pub use results::Results;
pub use upload::FileUpload;
