/// Strips byte-order marks and zero-width spaces, then collapses inner whitespace.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased header used for CGPA column matching.
pub(crate) fn header_key(value: &str) -> String {
    normalize_header(value).to_ascii_lowercase()
}

/// Trimmed cell, `None` when blank.
pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
