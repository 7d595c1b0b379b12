use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::{Timestamp, elapsed_ms};

pub const AGENT_SPAN_TYPE: &str = "agent";
pub const GENERATION_SPAN_TYPE: &str = "generation";
pub const FUNCTION_SPAN_TYPE: &str = "function";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpanRecord {
    pub id: String,
    pub trace_id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub started_at: Timestamp,
    #[serde(default)]
    pub ended_at: Timestamp,
    #[serde(default)]
    pub span_type: Option<String>,
    #[serde(default, deserialize_with = "object_or_empty")]
    pub span_data: Map<String, Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl SpanRecord {
    /// `span_data.type` when it is a non-blank string, else `span_type`.
    pub fn declared_type(&self) -> Option<&str> {
        self.span_data
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                self.span_type
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
            })
    }

    /// Signed duration; negative or `NaN` for malformed input.
    pub fn duration_ms(&self) -> f64 {
        elapsed_ms(&self.started_at, &self.ended_at)
    }

    pub fn function_name(&self) -> Option<&str> {
        self.span_data
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
    }
}

pub fn display_name(declared_type: &str) -> &str {
    match declared_type {
        GENERATION_SPAN_TYPE => "Text generation",
        FUNCTION_SPAN_TYPE => "Tool call",
        other => other,
    }
}

fn object_or_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    })
}
