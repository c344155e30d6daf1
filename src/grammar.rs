//! Identifier grammar helpers for MIME type names.
//!
//! A type identifier is `media/sub` where each segment is built from
//! letters, digits, `_`, `.`, `+`, and `-`. The media segment must be
//! non-empty; the sub segment may be empty.

/// Reports whether the character may appear in an identifier segment.
pub fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
}

/// Reports whether the string is a valid identifier segment.
///
/// `allow_empty` admits the zero-length sub-type segment.
pub fn is_segment(s: &str, allow_empty: bool) -> bool {
    (allow_empty || !s.is_empty()) && s.chars().all(is_segment_char)
}

/// Splits an identifier into its `(media, sub)` segments.
///
/// The whole string must match the grammar; trailing or embedded junk is
/// rejected. Returns `None` on any mismatch.
pub fn split_identifier(s: &str) -> Option<(&str, &str)> {
    let (media, sub) = s.split_once('/')?;
    if !is_segment(media, false) || !is_segment(sub, true) {
        return None;
    }
    Some((media, sub))
}

/// Strips leading `x-`/`X-` markers from a segment.
///
/// Stacked markers are removed down to a fixed point, and a segment is
/// never stripped to nothing, so that normalization is idempotent.
fn strip_unregistered_marker(mut s: &str) -> &str {
    while s.len() > 2 && s[..2].eq_ignore_ascii_case("x-") {
        s = &s[2..];
    }
    s
}

/// Normalizes one identifier segment: lowercase, leading `x-` removed.
pub(crate) fn simplify_segment(s: &str) -> String {
    strip_unregistered_marker(s).to_ascii_lowercase()
}

/// Reduces an identifier to its canonical comparison form.
///
/// Each segment is lowercased and any leading `x-` marker is removed
/// independently. Returns `None` when the string does not match the
/// identifier grammar. Idempotent for every valid input.
///
/// # Examples
///
/// ```
/// use mime_registry::grammar::simplify;
///
/// assert_eq!(simplify("TEXT/PLAIN"), Some("text/plain".to_string()));
/// assert_eq!(simplify("X-Appl/x-Zip"), Some("appl/zip".to_string()));
/// assert_eq!(simplify("not-a-type"), None);
/// ```
pub fn simplify(content_type: &str) -> Option<String> {
    let (media, sub) = split_identifier(content_type)?;
    Some(format!(
        "{}/{}",
        simplify_segment(media),
        simplify_segment(sub)
    ))
}
