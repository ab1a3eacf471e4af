//! Splitting a `CREATE TABLE` body into column/constraint segments

use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};

/// How a table body is divided into segments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColumnSplit {
    /// Split on every comma. Types with a comma inside parentheses, such as
    /// `numeric(10,2)`, are broken into two segments.
    #[default]
    Naive,
    /// Split only on commas at parenthesis depth 0 that are outside string
    /// literals and comments.
    ParenDepth,
}

/// Split `body` into trimmed, non-empty segments with line breaks folded to spaces.
pub fn split_segments(body: &str, mode: ColumnSplit) -> Vec<String> {
    let raw: Vec<String> = match mode {
        ColumnSplit::Naive => body.split(',').map(str::to_string).collect(),
        ColumnSplit::ParenDepth => split_top_level(body).unwrap_or_else(|| {
            tracing::debug!("table body did not tokenize, falling back to naive split");
            body.split(',').map(str::to_string).collect()
        }),
    };

    raw.into_iter()
        .map(|segment| segment.replace(['\r', '\n'], " ").trim().to_string())
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Token-aware split at depth-0 commas. `None` if the body cannot be tokenized.
fn split_top_level(body: &str) -> Option<Vec<String>> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, body).tokenize().ok()?;

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;

    for token in &tokens {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                segments.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push_str(&token.to_string());
    }
    segments.push(current);

    Some(segments)
}
