//! Content type inspection for uploaded files.

use std::path::Path;

use mediaferry_core::constants::DEFAULT_CONTENT_TYPE;

/// Determine the content type for a file about to be stored.
///
/// Magic bytes win over the extension, and the extension wins over whatever the
/// caller claims, so a renamed file is still served with its real type.
pub fn detect_content_type(path: &Path, data: &[u8], hint: Option<&str>) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    if let Some(guess) = mime_guess::from_path(path).first() {
        return guess.essence_str().to_string();
    }

    match hint {
        Some(hint) if !hint.trim().is_empty() => hint.trim().to_lowercase(),
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    }
}
