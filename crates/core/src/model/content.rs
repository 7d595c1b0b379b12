use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Producer-agnostic view of a span payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpanContent {
    Generation(GenerationContent),
    Function(FunctionContent),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerationContent {
    pub model: Option<String>,
    pub parameters: BTreeMap<String, Value>,
    pub input_messages: Vec<InputMessage>,
    pub output_items: Vec<OutputItem>,
    pub error: Option<Value>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputMessage {
    pub role: String,
    pub content: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputItem {
    Reasoning { text: String },
    Message { text: String },
    Raw { value: Value },
}

/// Token counts copied verbatim from the payload; no numeric validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenUsage {
    pub input_tokens: Option<Value>,
    pub output_tokens: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FunctionContent {
    pub name: Option<String>,
    pub arguments: Option<Value>,
    pub result: Option<Value>,
}
