//! Balanced-brace scanner for locating JSON objects inside arbitrary text

/// Return every balanced top-level `{ ... }` span in `text`, in order.
///
/// Depth only changes outside string literals. A string literal is entered
/// and exited on an unescaped `"`, and a backslash inside a literal escapes
/// the next character. String state is tracked only inside a candidate span,
/// so stray quotes in surrounding prose cannot swallow an object. A `}` with
/// no open span is ignored, and an unclosed span yields nothing.
pub fn balanced_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth: usize = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if depth == 0 {
            if ch == '{' {
                start = Some(idx);
                depth = 1;
            }
            continue;
        }

        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    if let Some(begin) = start.take() {
                        spans.push(&text[begin..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    spans
}
