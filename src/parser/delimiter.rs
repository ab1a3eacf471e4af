//! Field delimiter detection for CSV content
//!
//! Spreadsheet exports use whatever separator the locale dictates, so the
//! delimiter is inferred from the content:
//!
//! 1. A `sep=X` first line (written by Excel and friends) always wins.
//! 2. Otherwise up to [`SAMPLE_LINES`] non-empty lines are split with each
//!    candidate in [`CANDIDATES`] order, and the candidate yielding the most
//!    consistent multi-column field count is chosen.

use crate::util::{split_first_line, starts_with_ci};

/// Candidate delimiters in preference order. Earlier candidates win ties.
pub const CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Number of non-empty lines sampled for detection.
pub const SAMPLE_LINES: usize = 50;

/// Delimiter used when nothing better can be inferred.
pub const DEFAULT_DELIMITER: char = ',';

const MULTI_COLUMN_BONUS: i64 = 1000;

/// Scoring result for one candidate delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DelimiterScore {
    delimiter: char,
    mode_field_count: usize,
    score: i64,
}

/// Parse a `sep=X` hint line (case-insensitive, exactly one character).
///
/// Leading spaces and any spaces or `\r` after the hinted character are
/// ignored. The hinted character itself is never trimmed, so `sep=<TAB>` and
/// `sep=<SPACE>` both work.
pub(crate) fn parse_sep_hint(line: &str) -> Option<char> {
    let line = line.trim_start_matches(' ');
    if !starts_with_ci(line, "sep=") {
        return None;
    }
    let mut rest = line[4..].chars();
    let hint = rest.next()?;
    if rest.all(|c| c == ' ' || c == '\r') {
        Some(hint)
    } else {
        None
    }
}

/// Detect the field delimiter used by `content`.
pub fn detect_delimiter(content: &str) -> char {
    let (first_line, _) = split_first_line(content);
    if let Some(hint) = parse_sep_hint(first_line) {
        return hint;
    }

    let lines: Vec<&str> = content
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .take(SAMPLE_LINES)
        .collect();

    if lines.is_empty() {
        return DEFAULT_DELIMITER;
    }

    let mut best: Option<DelimiterScore> = None;
    for delimiter in CANDIDATES {
        let candidate = score_candidate(&lines, delimiter);
        tracing::trace!(
            delimiter = ?candidate.delimiter,
            mode = candidate.mode_field_count,
            score = candidate.score,
            "scored delimiter candidate"
        );
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }

    best.map_or(DEFAULT_DELIMITER, |b| b.delimiter)
}

fn score_candidate(lines: &[&str], delimiter: char) -> DelimiterScore {
    let counts: Vec<usize> = lines
        .iter()
        .map(|line| count_fields_quoted(line, delimiter))
        .collect();
    let mode = mode_of(&counts);

    let variance_penalty: i64 = counts
        .iter()
        .map(|&count| (count as i64 - mode as i64).abs())
        .sum();
    let multi_column = if mode > 1 {
        MULTI_COLUMN_BONUS
    } else {
        -MULTI_COLUMN_BONUS
    };

    DelimiterScore {
        delimiter,
        mode_field_count: mode,
        score: multi_column - variance_penalty,
    }
}

/// Count fields in a single line, ignoring delimiters inside quotes.
///
/// A quote toggles the quoted state; a doubled quote inside quotes is a
/// literal and does not toggle.
fn count_fields_quoted(line: &str, delimiter: char) -> usize {
    let mut fields = 1;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            fields += 1;
        }
    }
    fields
}

/// Most frequent value; ties go to the value nearest the median of the
/// sorted list (the smaller one when equally near).
fn mode_of(counts: &[usize]) -> usize {
    if counts.is_empty() {
        return 1;
    }
    let mut sorted = counts.to_vec();
    sorted.sort_unstable();
    let median = sorted[sorted.len() / 2];

    // (value, frequency) runs over the sorted list
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &count in &sorted {
        match runs.last_mut() {
            Some((value, freq)) if *value == count => *freq += 1,
            _ => runs.push((count, 1)),
        }
    }
    let top = runs.iter().map(|&(_, freq)| freq).max().unwrap_or(0);

    runs.iter()
        .filter(|&&(_, freq)| freq == top)
        .map(|&(value, _)| value)
        .min_by_key(|&value| (value.abs_diff(median), value))
        .unwrap_or(median)
}
