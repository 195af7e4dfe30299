//! Best-effort recovery of a JSON object from free-form LLM output.
//!
//! Models wrap their answers in prose, code fences and the occasional
//! trailing comma. This module isolates the outermost brace-delimited
//! object, parses it strictly, and applies a single documented repair pass
//! before giving up. Failures are reported as `None`, never as a panic.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*").expect("valid regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));

/// Which repair, if any, produced the parsed value.
///
/// Recorded so callers can audit how far the output drifted from valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    /// A comma before a closing `}` or `]` was removed.
    TrailingComma,
}

/// A recovered JSON object together with the repair applied to obtain it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub value: Value,
    pub repair: Option<Repair>,
}

/// Extracts a JSON object embedded in free-form text.
///
/// The heuristic trims everything before the first `{` and after the last
/// `}`, so inputs containing several brace-delimited substrings can be both
/// under- and over-trimmed. Returns `None` when no parseable object remains.
pub fn extract_json(text: &str) -> Option<Extraction> {
    if text.trim().is_empty() {
        return None;
    }

    let unfenced = CODE_FENCE.replace_all(text, "");

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end < start {
        return None;
    }
    let candidate = &unfenced[start..=end];

    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Some(Extraction { value, repair: None });
    }

    let repaired = TRAILING_COMMA.replace_all(candidate, "$1");
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => Some(Extraction {
            value,
            repair: Some(Repair::TrailingComma),
        }),
        Err(_) => None,
    }
}

/// Normalizes a tool argument into a bare query string.
///
/// Models hand arguments over in several shapes: a proper JSON object
/// (`{"query": "..."}`), the string form of that object, or the plain
/// string itself. All collapse to the inner string.
pub fn clean_input_for_tool(input: &Value) -> String {
    match input {
        // Prefer the canonical "query" key; object key order is not
        // preserved through serde_json, so "first value" is unreliable.
        Value::Object(map) => map
            .get("query")
            .or_else(|| map.values().next())
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .unwrap_or_default()
            .trim()
            .to_string(),
        Value::String(s) => {
            if let Ok(parsed) = serde_json::from_str::<Value>(s) {
                if parsed.is_object() {
                    return clean_input_for_tool(&parsed);
                }
            }
            s.replace("{\"query\":", "")
                .replace('}', "")
                .replace('"', "")
                .trim()
                .to_string()
        }
        other => other.to_string().trim().to_string(),
    }
}
