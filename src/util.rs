//! Shared utility helpers.

use encoding_rs::WINDOWS_1252;

/// Case-insensitive substring search without allocating an uppercase copy.
#[inline]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle_bytes = needle.as_bytes();
    let haystack_bytes = haystack.as_bytes();
    if needle_bytes.len() > haystack_bytes.len() {
        return false;
    }
    haystack_bytes
        .windows(needle_bytes.len())
        .any(|window| window.eq_ignore_ascii_case(needle_bytes))
}

/// Case-insensitive starts_with check without allocating.
#[inline]
pub fn starts_with_ci(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.as_bytes()[..needle.len()].eq_ignore_ascii_case(needle.as_bytes())
}

/// Remove a leading UTF-8 byte-order-mark, if any.
#[inline]
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{FEFF}').unwrap_or(s)
}

/// Split off the first line.
///
/// Returns `(line, rest)` where `line` excludes its terminator and `rest`
/// starts after it. A `\r\n` pair counts as one terminator; `rest` is empty
/// when there is no line break.
pub fn split_first_line(s: &str) -> (&str, &str) {
    match s.find(['\r', '\n']) {
        Some(idx) => {
            let after = if s[idx..].starts_with("\r\n") { idx + 2 } else { idx + 1 };
            (&s[..idx], &s[after..])
        }
        None => (s, ""),
    }
}

/// Decode raw bytes as text, trying UTF-8 first, then Windows-1252 as fallback.
///
/// Spreadsheet exports from Windows machines are frequently Windows-1252.
/// Returns `None` when neither encoding decodes cleanly. A BOM is kept;
/// the CSV tokenizer strips it.
pub fn decode_text(bytes: &[u8]) -> Option<String> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                None
            } else {
                Some(decoded.into_owned())
            }
        }
    }
}
