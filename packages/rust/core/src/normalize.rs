//! Validation and defaulting of parsed records into the PayloadCMS schema.
//!
//! Every field is resolved independently; only the `meta` fallbacks depend on
//! the already-resolved top-level title.

use serde_json::Value;
use tracing::{debug, instrument};

use payloadforge_shared::{Block, Meta, NormalizeConfig, NormalizedRecord};

/// Why a parsed record could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The top-level value is not a JSON object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },
}

/// Normalize a parsed record into a [`NormalizedRecord`].
///
/// | Field | Rule |
/// |---|---|
/// | `title` | source value verbatim (any JSON), else the default title |
/// | `meta` | source mapping with per-key fallbacks, else synthesized |
/// | `blocks` | source blocks having `type` and `content`, else one placeholder |
/// | `slug` | copied if present |
/// | `categories` | copied if present and a sequence |
/// | `heroImage` | truthiness of the source value, if present |
#[instrument(skip_all)]
pub fn normalize(
    parsed: &Value,
    config: &NormalizeConfig,
) -> Result<NormalizedRecord, ValidationError> {
    let Value::Object(data) = parsed else {
        return Err(ValidationError::NotAnObject {
            found: kind_of(parsed),
        });
    };

    // Present keys win even when they hold `null` or structured values.
    let title = data
        .get("title")
        .cloned()
        .unwrap_or_else(|| Value::String(config.default_title.clone()));
    let default_description = || Value::String(config.default_description.clone());

    let meta = match data.get("meta") {
        Some(Value::Object(meta)) => Meta {
            title: meta.get("title").cloned().unwrap_or_else(|| title.clone()),
            description: meta
                .get("description")
                .cloned()
                .unwrap_or_else(default_description),
        },
        _ => Meta {
            title: title.clone(),
            description: default_description(),
        },
    };

    let blocks = resolve_blocks(data.get("blocks"), config);

    let slug = data.get("slug").cloned();

    let categories = match data.get("categories") {
        Some(Value::Array(items)) => Some(items.clone()),
        _ => None,
    };

    let hero_image = data.get("heroImage").map(is_truthy);

    debug!(
        block_count = blocks.len(),
        has_slug = slug.is_some(),
        has_categories = categories.is_some(),
        "record normalized"
    );

    Ok(NormalizedRecord {
        title,
        meta,
        blocks,
        slug,
        categories,
        hero_image,
    })
}

/// Keep blocks that are mappings with `type` and `content`, in order.
fn resolve_blocks(source: Option<&Value>, config: &NormalizeConfig) -> Vec<Block> {
    let kept: Vec<Block> = match source {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .filter_map(Block::from_map)
            .collect(),
        _ => Vec::new(),
    };

    if kept.is_empty() {
        debug!("no usable blocks, using placeholder");
        return vec![Block::new(
            config.default_block_type.clone(),
            config.default_block_content.clone(),
        )];
    }

    kept
}

/// Truthiness: null, false, zero, and empty strings/sequences/mappings are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
