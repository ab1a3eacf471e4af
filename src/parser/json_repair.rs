//! Repairs for near-miss JSON produced by language models

use once_cell::sync::Lazy;
use regex::Regex;

/// Markdown fence markers, with or without a language tag
static FENCE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:json|javascript|js)?").expect("Invalid fence marker regex")
});

/// Rewrite single-quoted strings as double-quoted ones.
///
/// Unescaped single quotes outside double-quoted strings become `"`. Inside a
/// single-quoted string, `\'` becomes a plain `'` and a bare `"` is escaped.
/// Double-quoted strings are copied verbatim, so apostrophes in them survive.
pub fn single_to_double_quotes(text: &str) -> String {
    #[derive(PartialEq)]
    enum Quote {
        None,
        Double,
        Single,
    }

    let mut out = String::with_capacity(text.len());
    let mut quote = Quote::None;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match quote {
            Quote::None => match ch {
                '"' => {
                    quote = Quote::Double;
                    out.push(ch);
                }
                '\'' => {
                    quote = Quote::Single;
                    out.push('"');
                }
                _ => out.push(ch),
            },
            Quote::Double => {
                out.push(ch);
                if ch == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else if ch == '"' {
                    quote = Quote::None;
                }
            }
            Quote::Single => match ch {
                '\\' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    out.push('\'');
                }
                '\\' => {
                    out.push(ch);
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => out.push_str("\\\""),
                '\'' => {
                    quote = Quote::None;
                    out.push('"');
                }
                _ => out.push(ch),
            },
        }
    }

    out
}

/// Strip fence markers and trim to the outermost JSON-looking region.
///
/// The region starts at the first `{` or `[` and ends at the last `}` or `]`,
/// whichever comes later. Prose brackets before an object therefore widen the
/// region instead of cutting the object off. Text without such a region is
/// returned trimmed but otherwise unchanged.
pub fn sanitize(text: &str) -> String {
    let stripped = FENCE_MARKER_RE.replace_all(text, "");
    let trimmed = stripped.trim();

    let Some(open) = trimmed.find(['{', '[']) else {
        return trimmed.to_string();
    };

    match trimmed.rfind(['}', ']']) {
        Some(close) if close > open => trimmed[open..=close].to_string(),
        _ => trimmed.to_string(),
    }
}
