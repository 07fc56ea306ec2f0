//! Local checks applied to a file before it is uploaded.

use crate::types::ValidationError;

/// Largest accepted upload: 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Declared type for files that are neither declared as nor named like
/// an image; the validator refuses it.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Filename extensions mapped to the MIME type assumed when the picker
/// does not declare one.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// The parts of a file the validator looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDescriptor<'a> {
    /// Declared MIME type.
    pub mime_type: &'a str,
    /// Size in bytes.
    pub size: u64,
}

/// `Ok(())` when the file may be uploaded, otherwise the reason it may not.
pub type ValidationOutcome = Result<(), ValidationError>;

/// Check a file against the default 10 MiB limit.
///
/// # Errors
///
/// Returns [`ValidationError::NotAnImage`] if the MIME type does not
/// start with `image/`, or [`ValidationError::TooLarge`] if the file is
/// larger than [`MAX_UPLOAD_BYTES`].
pub fn validate(file: &FileDescriptor<'_>) -> ValidationOutcome {
    validate_with_limit(file, MAX_UPLOAD_BYTES)
}

/// Check a file against an explicit size limit.
///
/// The type check runs first, so a large text file reports
/// [`ValidationError::NotAnImage`].
///
/// # Errors
///
/// Same as [`validate`], with `max_bytes` as the size limit.
pub fn validate_with_limit(file: &FileDescriptor<'_>, max_bytes: u64) -> ValidationOutcome {
    if !file.mime_type.starts_with("image/") {
        return Err(ValidationError::NotAnImage);
    }
    if file.size > max_bytes {
        return Err(ValidationError::TooLarge);
    }
    Ok(())
}

/// Guess an image MIME type from a filename's extension.
///
/// Returns `None` for names without a recognized image extension.
#[must_use]
pub fn mime_for_filename(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    IMAGE_EXTENSIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|&(_, mime)| mime)
}

/// The MIME type to validate: the picker's declared type, or a guess
/// from the extension when it declared none.
#[must_use]
pub fn resolve_mime_type(name: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(declared) if !declared.is_empty() => declared.to_owned(),
        _ => mime_for_filename(name).unwrap_or(UNKNOWN_MIME_TYPE).to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(mime_type: &str, size: u64) -> FileDescriptor<'_> {
        FileDescriptor { mime_type, size }
    }

    #[test]
    fn exactly_the_limit_is_accepted() {
        assert_eq!(validate(&descriptor("image/jpeg", 10 * 1024 * 1024)), Ok(()));
    }

    #[test]
    fn one_byte_over_the_limit_is_rejected() {
        assert_eq!(
            validate(&descriptor("image/jpeg", 10 * 1024 * 1024 + 1)),
            Err(ValidationError::TooLarge)
        );
    }

    #[test]
    fn text_is_rejected_regardless_of_size() {
        for size in [0, 1, 2 * 1024 * 1024, 50 * 1024 * 1024] {
            assert_eq!(
                validate(&descriptor("text/plain", size)),
                Err(ValidationError::NotAnImage)
            );
        }
    }

    #[test]
    fn any_image_subtype_is_accepted() {
        for mime in ["image/png", "image/jpeg", "image/webp", "image/heic", "image/svg+xml"] {
            assert_eq!(validate(&descriptor(mime, 2048)), Ok(()), "{mime}");
        }
    }

    #[test]
    fn empty_mime_type_is_rejected() {
        assert_eq!(
            validate(&descriptor("", 10)),
            Err(ValidationError::NotAnImage)
        );
    }

    #[test]
    fn custom_limit_is_honoured() {
        assert_eq!(
            validate_with_limit(&descriptor("image/png", 101), 100),
            Err(ValidationError::TooLarge)
        );
        assert_eq!(validate_with_limit(&descriptor("image/png", 100), 100), Ok(()));
    }

    #[test]
    fn mime_guessed_from_extension() {
        assert_eq!(mime_for_filename("selfie.JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_filename("archive.tar.webp"), Some("image/webp"));
        assert_eq!(mime_for_filename("notes.txt"), None);
        assert_eq!(mime_for_filename("no_extension"), None);
    }

    #[test]
    fn declared_type_wins_over_extension() {
        assert_eq!(resolve_mime_type("me.avif", Some("image/avif")), "image/avif");
        assert_eq!(resolve_mime_type("selfie", Some("image/jpeg")), "image/jpeg");
        assert_eq!(resolve_mime_type("photo.png", Some("text/plain")), "text/plain");
    }

    #[test]
    fn extension_guess_only_without_declared_type() {
        assert_eq!(resolve_mime_type("me.webp", None), "image/webp");
        assert_eq!(resolve_mime_type("me.JPG", Some("")), "image/jpeg");
        assert_eq!(resolve_mime_type("notes", None), UNKNOWN_MIME_TYPE);
    }

    #[test]
    fn declared_image_types_pass_the_validator() {
        for (name, declared) in [
            ("me.avif", "image/avif"),
            ("me.heic", "image/heic"),
            ("me.tiff", "image/tiff"),
            ("me.svg", "image/svg+xml"),
            ("selfie", "image/jpeg"),
        ] {
            let mime_type = resolve_mime_type(name, Some(declared));
            assert_eq!(validate(&descriptor(&mime_type, 1024)), Ok(()), "{name}");
        }
    }
}
