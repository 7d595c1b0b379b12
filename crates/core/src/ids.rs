use serde::{Deserialize, Serialize};

use crate::error::{Result, TraceDeckError};

/// Conversation (trace group) identifier as handed out by the trace source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

/// Trace (turn) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl ConversationId {
    pub fn parse(input: &str) -> Result<Self> {
        validate_segment("conversation id", input).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TraceId {
    pub fn parse(input: &str) -> Result<Self> {
        validate_segment("trace id", input).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Ids are opaque but end up as URL path segments.
fn validate_segment(kind: &str, input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty()
        || trimmed
            .chars()
            .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
    {
        return Err(TraceDeckError::InvalidArgument(format!(
            "invalid {kind}: {input:?}"
        )));
    }
    Ok(trimmed.to_string())
}
