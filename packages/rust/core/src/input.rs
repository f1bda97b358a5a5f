//! Upstream item handling: parsing item payloads and selecting the agent text.

use serde_json::Value;
use tracing::debug;

use payloadforge_shared::{InputConfig, PayloadForgeError, Result, UpstreamItem};

/// Interpret a JSON document as a sequence of upstream items.
///
/// Accepts an array of mappings or a single mapping (treated as one item).
pub fn items_from_value(value: Value) -> Result<Vec<UpstreamItem>> {
    match value {
        Value::Array(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Value::Object(fields) => Ok(UpstreamItem::new(fields)),
                _ => Err(PayloadForgeError::input(format!(
                    "item {i} is not a JSON object"
                ))),
            })
            .collect(),
        Value::Object(fields) => Ok(vec![UpstreamItem::new(fields)]),
        _ => Err(PayloadForgeError::input(
            "expected a JSON array of items or a single item object",
        )),
    }
}

/// Select the agent output text from upstream items.
///
/// Items are scanned in order and, within each item, the candidate fields
/// are tried in configured order; the first field present wins. If no item
/// carries any candidate field, the whole first item is serialized instead.
pub fn select_text(items: &[UpstreamItem], config: &InputConfig) -> String {
    for (index, item) in items.iter().enumerate() {
        let fields = item.fields();
        for name in &config.fields {
            if let Some(value) = fields.get(name) {
                debug!(item = index, field = %name, "selected upstream field");
                return value_as_text(value);
            }
        }
    }

    match items.first() {
        Some(item) => {
            debug!("no candidate field found, using first item verbatim");
            Value::Object(item.fields().clone()).to_string()
        }
        None => {
            debug!("no upstream items");
            String::new()
        }
    }
}

/// Strings are taken as-is; anything else is rendered as compact JSON.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
