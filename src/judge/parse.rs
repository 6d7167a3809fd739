// Staged parser for LLM judge replies.
//
// The model is asked for strict JSON but regularly wraps it in markdown fences
// or surrounds it with prose. Each stage below either yields a JSON object or
// hands over to the next one; the last stage always succeeds with an
// `{error, raw}` object, so parsing never fails.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::{json, Map, Value};

pub const PARSE_FAILURE: &str = "Failed to parse AI response";

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("fence pattern is valid"));

// Greedy: first `{` through last `}` anywhere in the reply.
static OBJECT_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("object pattern is valid"));

/// Which stage produced the parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// Reply was JSON once code fences were removed
    Direct,
    /// JSON object extracted from surrounding text
    Extracted,
    /// Nothing parsed; value is the `{error, raw}` object
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub value: Value,
    pub stage: ParseStage,
}

/// Parse a judge reply. Never fails.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let raw = raw.trim();

    if let Some(value) = parse_object(&strip_fences(raw)) {
        return ParsedReply {
            value,
            stage: ParseStage::Direct,
        };
    }

    if let Some(value) = extract_object(raw) {
        return ParsedReply {
            value,
            stage: ParseStage::Extracted,
        };
    }

    ParsedReply {
        value: fallback(raw),
        stage: ParseStage::Fallback,
    }
}

/// Remove ``` and ```json markers (any case) and trim.
pub fn strip_fences(text: &str) -> String {
    FENCE.replace_all(text, "").replace("```", "").trim().to_string()
}

fn extract_object(text: &str) -> Option<Value> {
    OBJECT_SPAN
        .find(text)
        .and_then(|m| parse_object(m.as_str()))
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// The degraded result carried in place of a rubric.
pub fn fallback(raw: &str) -> Value {
    json!({ "error": PARSE_FAILURE, "raw": raw })
}

/// Degraded result for a reply that never arrived.
pub fn request_failure(message: &str) -> Value {
    let mut map = Map::new();
    map.insert("error".to_string(), Value::String(message.to_string()));
    map.insert("raw".to_string(), Value::String(String::new()));
    Value::Object(map)
}
