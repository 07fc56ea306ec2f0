//! lookalike-io: Browser I/O and Dioxus component library.
//!
//! Handles reading uploads, Blob URL previews, the multipart `fetch`
//! transfer, and analytics, and provides the UI components for the
//! lookalike web application. [`ViewModel`] is the render target the
//! session drives.

pub mod analytics;
pub mod components;
pub mod preview;
pub mod transfer;
pub mod view;

pub use components::{AlertBanner, ConfidenceBar, FileUpload, Results};
pub use preview::{BlobPreviews, PreviewError, PreviewRenderer};
pub use transfer::FetchTransfer;
pub use view::{Alert, AlertKind, ResultsPanel, ViewModel};
