//! Resilient extraction of JSON values from free-form model output
//!
//! Model replies wrap JSON in markdown fences, surround it with prose, emit
//! several objects back to back, or use single quotes. Extraction runs a
//! fixed pipeline where each stage only runs if the previous ones produced
//! no values:
//!
//! 1. Fenced blocks (```` ```json ... ``` ```` or bare ```` ``` ````): balanced
//!    objects are extracted from each block's inner text.
//! 2. Whole text: the text is sanitized (fence markers stripped, trimmed to
//!    the outermost `{`/`[` region) and balanced objects are extracted.
//! 3. Last resort: the sanitized text is parsed as a single JSON value.
//!
//! Every candidate is parsed as-is first, then once more after rewriting
//! single quotes. Values are returned in source order and are always valid
//! JSON. When nothing is found, [`SchemaRecoverError::NoJsonFound`] is
//! returned so callers can tell a failed extraction from an empty one.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::json_repair::{sanitize, single_to_double_quotes};
use super::json_scanner::balanced_objects;
use crate::error::SchemaRecoverError;

/// Fenced code blocks; the inner text is captured lazily up to the next fence.
static FENCED_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:json|javascript|js)?\s*([\s\S]+?)```")
        .expect("Invalid fenced block regex")
});

/// Outcome of parsing one candidate span
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateResult {
    Parsed(Value),
    Failed(String),
}

/// A candidate substring and the result of parsing it
#[derive(Debug, Clone, PartialEq)]
pub struct JsonCandidate {
    pub raw_text: String,
    pub result: CandidateResult,
    /// Parsed only after the single-quote repair
    pub repaired: bool,
}

/// Pipeline stage that produced the returned values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    FencedBlocks,
    WholeText,
    SingleValue,
}

/// Successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub values: Vec<Value>,
    /// Candidates that failed to parse even after repair
    pub failures: usize,
    pub stage: ExtractionStage,
}

/// Extract every JSON value from `text`.
pub fn extract_json_objects(text: &str) -> Result<Extraction, SchemaRecoverError> {
    let mut candidates = 0;
    let mut failures = 0;

    // Stage 1: fenced blocks
    let mut fenced = Vec::new();
    for caps in FENCED_BLOCK_RE.captures_iter(text) {
        if let Some(inner) = caps.get(1) {
            fenced.extend(extract_candidates(inner.as_str()));
        }
    }
    tracing::debug!(candidates = fenced.len(), "extracted fenced-block candidates");
    if let Some(extraction) =
        collect(fenced, ExtractionStage::FencedBlocks, &mut candidates, &mut failures)
    {
        return Ok(extraction);
    }

    // Stage 2: sanitized whole text
    let sanitized = sanitize(text);
    let whole = extract_candidates(&sanitized);
    tracing::debug!(candidates = whole.len(), "extracted whole-text candidates");
    if let Some(extraction) =
        collect(whole, ExtractionStage::WholeText, &mut candidates, &mut failures)
    {
        return Ok(extraction);
    }

    // Stage 3: the sanitized text as one value, no repair
    candidates += 1;
    match serde_json::from_str::<Value>(&sanitized) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(Extraction {
            values: vec![value],
            failures,
            stage: ExtractionStage::SingleValue,
        }),
        Ok(_) | Err(_) => {
            failures += 1;
            tracing::warn!(candidates, failures, "no JSON found in text");
            Err(SchemaRecoverError::NoJsonFound { candidates, failures })
        }
    }
}

/// Locate balanced objects in `text` and try to parse each one.
pub fn extract_candidates(text: &str) -> Vec<JsonCandidate> {
    balanced_objects(text).into_iter().map(parse_candidate).collect()
}

fn parse_candidate(raw: &str) -> JsonCandidate {
    let (result, repaired) = match serde_json::from_str::<Value>(raw) {
        Ok(value) => (CandidateResult::Parsed(value), false),
        Err(first) => {
            let fixed = single_to_double_quotes(raw);
            match serde_json::from_str::<Value>(&fixed) {
                Ok(value) => (CandidateResult::Parsed(value), true),
                Err(second) => {
                    tracing::debug!(
                        error = %first,
                        retry_error = %second,
                        "discarding JSON candidate"
                    );
                    (CandidateResult::Failed(second.to_string()), false)
                }
            }
        }
    };

    JsonCandidate {
        raw_text: raw.to_string(),
        result,
        repaired,
    }
}

/// Tally a stage's candidates; `Some` if the stage produced any value.
fn collect(
    stage_candidates: Vec<JsonCandidate>,
    stage: ExtractionStage,
    candidates: &mut usize,
    failures: &mut usize,
) -> Option<Extraction> {
    let mut values = Vec::new();
    for candidate in stage_candidates {
        *candidates += 1;
        match candidate.result {
            CandidateResult::Parsed(value) => values.push(value),
            CandidateResult::Failed(_) => *failures += 1,
        }
    }

    if values.is_empty() {
        return None;
    }
    tracing::debug!(
        ?stage,
        values = values.len(),
        failures = *failures,
        "JSON extraction succeeded"
    );
    Some(Extraction {
        values,
        failures: *failures,
        stage,
    })
}
