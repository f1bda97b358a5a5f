//! End-to-end transform: upstream items → text → JSON object → normalized record.

use serde_json::Value;
use tracing::{info, instrument, warn};

use payloadforge_shared::{AppConfig, ErrorRecord, InputConfig, NormalizeConfig, Outcome, UpstreamItem};

use crate::input;
use crate::normalize;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Upstream text selection.
    pub input: InputConfig,
    /// Schema defaults.
    pub normalize: NormalizeConfig,
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            input: InputConfig::from(config),
            normalize: NormalizeConfig::from(config),
        }
    }
}

/// Run the pipeline over upstream items.
///
/// 1. Select the agent text from the items
/// 2. Extract and parse the embedded JSON object
/// 3. Normalize it into the PayloadCMS schema
#[instrument(skip_all, fields(items = items.len()))]
pub fn run(items: &[UpstreamItem], config: &PipelineConfig) -> Outcome {
    let text = input::select_text(items, &config.input);
    run_text(&text, &config.normalize)
}

/// Run extraction and normalization over raw agent text.
///
/// Failures come back as an [`ErrorRecord`]: parse failures carry the raw
/// text, validation failures carry the parsed record.
#[instrument(skip_all, fields(text_len = text.len()))]
pub fn run_text(text: &str, config: &NormalizeConfig) -> Outcome {
    match payloadforge_extract::parse_json_object(text) {
        Ok(parsed) => run_parsed(parsed, config),
        Err(e) => {
            warn!(error = %e, "could not recover a JSON object");
            Err(ErrorRecord::parse_failure(e, text))
        }
    }
}

/// Normalize an already-parsed record; a failure keeps the record as
/// `parsed_data`.
pub fn run_parsed(parsed: Value, config: &NormalizeConfig) -> Outcome {
    match normalize::normalize(&parsed, config) {
        Ok(record) => {
            info!(title = %record.title, blocks = record.blocks.len(), "record ready");
            Ok(record)
        }
        Err(e) => {
            warn!(error = %e, "parsed record failed validation");
            Err(ErrorRecord::validation_failure(e, parsed))
        }
    }
}

/// Render an outcome as the single-element sequence handed downstream.
pub fn to_output(outcome: &Outcome) -> Vec<Value> {
    let value = match outcome {
        Ok(record) => record.to_value(),
        Err(error) => error.to_value(),
    };
    vec![value]
}
