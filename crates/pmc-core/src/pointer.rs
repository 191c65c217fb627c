//! RFC 6901 JSON pointer helpers.
//!
//! Shared by reference resolution (`#/definitions/x` fragments) and by the
//! schema validator, which reports instance locations as ordered segments.

/// Split a JSON pointer into unescaped segments.
///
/// `""` yields no segments. A non-empty pointer must start with `/`;
/// anything else returns `None`.
pub fn split(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(Vec::new());
    }
    let rest = pointer.strip_prefix('/')?;
    Some(rest.split('/').map(unescape).collect())
}

/// Undo RFC 6901 escaping. `~1` must be replaced before `~0`.
pub fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Parse an array index segment. Leading zeros are not permitted.
pub fn array_index(segment: &str) -> Option<usize> {
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}
