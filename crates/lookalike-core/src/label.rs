//! Match label derivation from the service's image URL.
//!
//! The service names its reference images `<prefix>_<id>.<ext>`; the
//! label shown to the user is the `<id>` part.

/// Label used when the filename carries no identifier.
pub const PLACEHOLDER_LABEL: &str = "X";

/// Derive the match label from an image URL.
///
/// Takes the final `/`-delimited segment (ignoring any query string or
/// fragment), drops everything from the first `.`, splits on `_`, and
/// returns the second token. A missing or empty token yields
/// [`PLACEHOLDER_LABEL`].
#[must_use]
pub fn match_label(image_url: &str) -> String {
    let path = image_url.split(['?', '#']).next().unwrap_or(image_url);
    let filename = path.rsplit('/').next().unwrap_or(path);
    let stem = filename.split('.').next().unwrap_or(filename);
    stem.split('_')
        .nth(1)
        .filter(|token| !token.is_empty())
        .unwrap_or(PLACEHOLDER_LABEL)
        .to_owned()
}
