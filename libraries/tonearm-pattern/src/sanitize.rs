//! Filesystem-safe segment sanitization
//!
//! Applied per path segment, never to an assembled path: the `/` boundary
//! must survive template evaluation untouched.

/// Maximum segment length in Unicode code points
pub const MAX_SEGMENT_LENGTH: usize = 100;

/// Replacement for segments that sanitize away to nothing
const EMPTY_FALLBACK: &str = "Unknown";

/// Sanitize one path segment with the default length limit
pub fn sanitize_segment(segment: &str) -> String {
    sanitize_segment_with_limit(segment, MAX_SEGMENT_LENGTH)
}

/// Sanitize one path segment, clamping to `max_length` code points
///
/// Characters invalid on common filesystems (`< > : " / \ | ? *` and ASCII
/// controls) become `_`; runs of `_` collapse to one; leading and trailing
/// `_` and whitespace are stripped; a segment that ends up empty becomes
/// `"Unknown"`. Idempotent: sanitizing a sanitized segment is a no-op.
pub fn sanitize_segment_with_limit(segment: &str, max_length: usize) -> String {
    let replaced: String = segment
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    let mut last_was_underscore = false;
    for c in replaced.chars() {
        if c == '_' {
            if !last_was_underscore {
                collapsed.push(c);
            }
            last_was_underscore = true;
        } else {
            collapsed.push(c);
            last_was_underscore = false;
        }
    }

    let trimmed = collapsed.trim_matches(|c: char| c == '_' || c.is_whitespace());
    if trimmed.is_empty() {
        return EMPTY_FALLBACK.to_string();
    }

    let clamped: String = trimmed.chars().take(max_length).collect();
    // The cut may expose a trailing underscore or space
    let clamped = clamped.trim_end_matches(|c: char| c == '_' || c.is_whitespace());
    if clamped.is_empty() {
        EMPTY_FALLBACK.to_string()
    } else {
        clamped.to_string()
    }
}
