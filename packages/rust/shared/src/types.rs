//! Core domain types for payloadforge records.
//!
//! [`NormalizedRecord`] is the PayloadCMS-shaped record handed to the
//! downstream publisher; [`ErrorRecord`] takes its place when a run fails.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Result of one pipeline run: a normalized record, or the error record
/// reported in its place.
pub type Outcome = std::result::Result<NormalizedRecord, ErrorRecord>;

// ---------------------------------------------------------------------------
// NormalizedRecord
// ---------------------------------------------------------------------------

/// A content record conforming to the PayloadCMS schema.
///
/// Optional fields are omitted from the JSON form when absent; they are never
/// rendered as `null` unless the source itself carried `null`.
///
/// `title` and the `meta` texts are source values copied verbatim, so they
/// hold whatever JSON the agent produced (a string in practice).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Post title.
    pub title: Value,
    /// SEO metadata.
    pub meta: Meta,
    /// Ordered content blocks. Never empty.
    pub blocks: Vec<Block>,
    /// URL slug, copied verbatim from the source. `Some(Value::Null)` is a
    /// slug the source set to `null`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub slug: Option<Value>,
    /// Category references, copied verbatim from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Value>>,
    /// Whether the post should carry a hero image.
    #[serde(
        rename = "heroImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub hero_image: Option<bool>,
}

impl NormalizedRecord {
    /// Render the record as a JSON value.
    pub fn to_value(&self) -> Value {
        // Every field is a string, bool, or JSON value, so this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Deserialize a present key as `Some`, even when its value is `null`.
/// Absent keys fall back to `None` through `#[serde(default)]`.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// The `meta` mapping of a [`NormalizedRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub title: Value,
    pub description: Value,
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

static NULL: Value = Value::Null;

/// A single content block.
///
/// Blocks are kept verbatim (extra keys included); the only guarantee is that
/// `type` and `content` keys are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block(Map<String, Value>);

impl Block {
    /// Build a block from a `type` tag and string content.
    pub fn new(block_type: impl Into<String>, content: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert("type".into(), Value::String(block_type.into()));
        map.insert("content".into(), Value::String(content.into()));
        Self(map)
    }

    /// Wrap a mapping if it carries both a `type` and a `content` key.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        if map.contains_key("type") && map.contains_key("content") {
            Some(Self(map.clone()))
        } else {
            None
        }
    }

    /// The block's `type` value.
    pub fn block_type(&self) -> &Value {
        self.0.get("type").unwrap_or(&NULL)
    }

    /// The block's `content` value.
    pub fn content(&self) -> &Value {
        self.0.get("content").unwrap_or(&NULL)
    }

    /// All fields of the block, including any beyond `type`/`content`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// ErrorRecord
// ---------------------------------------------------------------------------

/// Record returned in place of a [`NormalizedRecord`] when a run fails.
///
/// Carries exactly one piece of debugging context: the raw agent output for
/// extraction failures, or the parsed record for validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Human-readable failure message.
    pub error: String,
    /// Original agent output (extraction failures).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    /// Record that failed normalization (validation failures).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_data: Option<Value>,
}

impl ErrorRecord {
    /// Error record for text that yielded no parseable JSON object.
    pub fn parse_failure(reason: impl std::fmt::Display, raw_output: impl Into<String>) -> Self {
        Self {
            error: format!("Failed to parse JSON: {reason}"),
            raw_output: Some(raw_output.into()),
            parsed_data: None,
        }
    }

    /// Error record for a parsed object that could not be normalized.
    pub fn validation_failure(reason: impl std::fmt::Display, parsed_data: Value) -> Self {
        Self {
            error: format!("Validation failed: {reason}"),
            raw_output: None,
            parsed_data: Some(parsed_data),
        }
    }

    /// Render the record as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// UpstreamItem
// ---------------------------------------------------------------------------

/// One unit of input from the preceding processing stage.
///
/// Items arrive either as a bare field mapping or wrapped in a `json`
/// envelope (`{"json": {...}}`); [`UpstreamItem::fields`] sees through the
/// envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamItem(Map<String, Value>);

impl UpstreamItem {
    /// Wrap a field mapping.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The item's generic field set, with a sole `json` envelope unwrapped.
    pub fn fields(&self) -> &Map<String, Value> {
        if self.0.len() == 1 {
            if let Some(Value::Object(inner)) = self.0.get("json") {
                return inner;
            }
        }
        &self.0
    }
}

impl From<Map<String, Value>> for UpstreamItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn normalized_record_omits_absent_optionals() {
        let record = NormalizedRecord {
            title: "T".into(),
            meta: Meta {
                title: "T".into(),
                description: "D".into(),
            },
            blocks: vec![Block::new("paragraph", "body")],
            slug: None,
            categories: None,
            hero_image: None,
        };

        let value = record.to_value();
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 3);
        assert!(!obj.contains_key("slug"));
        assert!(!obj.contains_key("heroImage"));
        assert_eq!(value["blocks"][0], json!({"type": "paragraph", "content": "body"}));
    }

    #[test]
    fn normalized_record_serializes_hero_image_camel_case() {
        let record = NormalizedRecord {
            title: "T".into(),
            meta: Meta {
                title: "T".into(),
                description: "D".into(),
            },
            blocks: vec![Block::new("paragraph", "body")],
            slug: Some(json!("my-post")),
            categories: Some(vec![json!("rust")]),
            hero_image: Some(false),
        };

        let json = serde_json::to_string(&record).expect("serialize");
        assert!(json.contains(r#""heroImage":false"#));
        assert!(json.contains(r#""slug":"my-post""#));

        let parsed: NormalizedRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
    }

    #[test]
    fn null_slug_survives_deserialization() {
        let json = r#"{"title":"T","meta":{"title":"T","description":"D"},"blocks":[],"slug":null}"#;
        let parsed: NormalizedRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.slug, Some(Value::Null));
        assert_eq!(serde_json::to_string(&parsed).expect("serialize"), json);

        let json = r#"{"title":"T","meta":{"title":"T","description":"D"},"blocks":[]}"#;
        let parsed: NormalizedRecord = serde_json::from_str(json).expect("deserialize");
        assert_eq!(parsed.slug, None);
    }

    #[test]
    fn block_requires_type_and_content() {
        let full = json!({"type": "heading", "content": "Intro", "level": 2});
        let block = Block::from_map(full.as_object().unwrap()).expect("valid block");
        assert_eq!(block.block_type(), &json!("heading"));
        assert_eq!(block.fields()["level"], json!(2));

        let partial = json!({"type": "heading"});
        assert!(Block::from_map(partial.as_object().unwrap()).is_none());
    }

    #[test]
    fn error_record_shapes() {
        let err = ErrorRecord::parse_failure("No JSON object found", "just prose");
        let value = err.to_value();
        assert_eq!(value["error"], "Failed to parse JSON: No JSON object found");
        assert_eq!(value["raw_output"], "just prose");
        assert!(value.get("parsed_data").is_none());

        let err = ErrorRecord::validation_failure("record is not an object", json!([1, 2]));
        let value = err.to_value();
        assert_eq!(value["error"], "Validation failed: record is not an object");
        assert_eq!(value["parsed_data"], json!([1, 2]));
        assert!(value.get("raw_output").is_none());
    }

    #[test]
    fn upstream_item_unwraps_json_envelope() {
        let wrapped: UpstreamItem =
            serde_json::from_value(json!({"json": {"output": "hi"}})).expect("item");
        assert_eq!(wrapped.fields()["output"], "hi");

        let bare: UpstreamItem = serde_json::from_value(json!({"output": "hi"})).expect("item");
        assert_eq!(bare.fields()["output"], "hi");

        // An envelope next to other keys is just another field.
        let mixed: UpstreamItem =
            serde_json::from_value(json!({"json": {"output": "a"}, "text": "b"})).expect("item");
        assert_eq!(mixed.fields().len(), 2);
    }
}
