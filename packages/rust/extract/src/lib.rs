//! JSON object extraction from free-form agent output.
//!
//! Language-model agents wrap their JSON in prose, markdown fences, and the
//! occasional stray quote. This crate narrows such text down to a single
//! balanced `{...}` object and parses it with `serde_json`, retrying once
//! after a quote-repair pass.

mod passes;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use payloadforge_shared::PayloadForgeError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why no JSON object could be recovered from a piece of text.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The text contains no `{` at all.
    #[error("No JSON object found")]
    NoJsonFound,

    /// The extracted candidate is not valid JSON, even after repair.
    /// Carries the error from the first (unrepaired) parse attempt.
    #[error("{source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },
}

impl From<ExtractError> for PayloadForgeError {
    fn from(err: ExtractError) -> Self {
        PayloadForgeError::Extraction(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Locate the JSON object embedded in `text` and return its source text.
///
/// The passes run in order:
/// 1. Strip markdown code-fence markers
/// 2. Drop text before the first `{` and after the last `}`
/// 3. Scan from the first `{` with a depth counter to its matching `}`
///
/// If the braces never balance, only the opening `{` is returned; the parse
/// step then reports the failure.
pub fn extract(text: &str) -> Result<String, ExtractError> {
    let unfenced = passes::strip_code_fences(text);
    let trimmed = passes::trim_to_braces(&unfenced);

    let start = trimmed.find('{').ok_or(ExtractError::NoJsonFound)?;
    let end = match passes::match_closing_brace(trimmed, start) {
        Some(end) => end,
        None => {
            debug!("braces never balanced, candidate collapses to opening brace");
            start
        }
    };

    let candidate = &trimmed[start..=end];
    debug!(
        input_len = text.len(),
        candidate_len = candidate.len(),
        "extracted JSON candidate"
    );
    Ok(candidate.to_string())
}

/// Extract the JSON object from `text` and parse it.
///
/// When the first parse fails, stray quotes wrapping nested objects are
/// stripped from the extracted candidate and the parse is retried once. A
/// failed retry reports the *first* parse error.
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_json_object(text: &str) -> Result<Value, ExtractError> {
    let candidate = extract(text)?;

    let first_err = match serde_json::from_str::<Value>(&candidate) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    warn!(error = %first_err, "JSON parse failed, retrying with quote repair");
    let repaired = passes::strip_wrapping_quotes(&candidate);

    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            debug!("quote repair succeeded");
            Ok(value)
        }
        Err(retry_err) => {
            debug!(error = %retry_err, "quote repair did not help");
            Err(ExtractError::Parse { source: first_err })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
