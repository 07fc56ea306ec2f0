//! File upload component with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use lookalike_core::validate::{FileDescriptor, resolve_mime_type, validate_with_limit};
use lookalike_core::{UploadFile, ValidationError};

/// Check a file from what the browser declares about it, before any of
/// its contents are read.
///
/// Returns the MIME type to upload with.
fn screen(
    name: &str,
    declared_type: Option<&str>,
    declared_size: u64,
    max_bytes: u64,
) -> Result<String, ValidationError> {
    let mime_type = resolve_mime_type(name, declared_type);
    validate_with_limit(
        &FileDescriptor {
            mime_type: &mime_type,
            size: declared_size,
        },
        max_bytes,
    )?;
    Ok(mime_type)
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the file once its bytes have been read.
    on_file: EventHandler<UploadFile>,
    /// Called instead of reading when the declared type or size is refused.
    on_rejected: EventHandler<ValidationError>,
    /// Called when the browser could not read the chosen file.
    on_read_error: EventHandler<String>,
    /// Preview of the current selection, shown inside the zone.
    preview_url: Option<String>,
    /// Largest accepted declared size.
    max_upload_bytes: u64,
    /// Recreates the hidden input when it changes, so the same file can
    /// be picked again.
    picker_key: u64,
}

/// A drop zone that doubles as the file picker.
///
/// Only the first file of a drop or selection is used. Its declared type
/// and size are checked before the bytes are read.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let max_bytes = props.max_upload_bytes;
    let picker_key = props.picker_key;

    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        let declared_size = file.size();
        let declared_type = file.content_type();
        let mime_type = match screen(&name, declared_type.as_deref(), declared_size, max_bytes) {
            Ok(mime_type) => mime_type,
            Err(reason) => {
                props.on_rejected.call(reason);
                return;
            }
        };
        match file.read_bytes().await {
            Ok(bytes) => props.on_file.call(
                UploadFile::new(name, mime_type, bytes.to_vec()).with_declared_size(declared_size),
            ),
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "failed to read file");
                props.on_read_error.call(format!("Failed to read file: {e}"));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "upload-zone dragover"
    } else {
        "upload-zone"
    };

    rsx! {
        label {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            input {
                key: "{picker_key}",
                r#type: "file",
                accept: "image/*",
                class: "hidden",
                onchange: handle_files,
            }

            if let Some(ref url) = props.preview_url {
                img { class: "upload-preview", src: "{url}", alt: "Your photo" }
            } else {
                p { class: "upload-prompt", "Drop a selfie here or click to choose" }
                p { class: "upload-hint", "Any image up to 10 MB" }
            }
        }
    }
}
