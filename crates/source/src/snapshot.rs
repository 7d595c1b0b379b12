use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracedeck_core::ids::{ConversationId, TraceId};
use tracedeck_core::model::span::SpanRecord;
use tracedeck_core::model::tool::ToolSchema;
use tracedeck_core::model::turn::{ConversationSummary, ConversationTraces, Neighbors, Turn};
use tracedeck_core::source::TraceSource;
use tracedeck_core::time::Timestamp;
use tracedeck_core::{Result, TraceDeckError};

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    conversations: Vec<SnapshotConversation>,
    #[serde(default)]
    tools: Vec<ToolSchema>,
}

#[derive(Debug, Deserialize)]
struct SnapshotConversation {
    #[serde(alias = "id")]
    group_id: String,
    #[serde(default)]
    started_at: Timestamp,
    #[serde(default)]
    instruction: Option<String>,
    #[serde(default)]
    traces: Vec<Turn>,
}

/// In-memory trace source backed by a JSON snapshot.
///
/// Neighbor navigation follows snapshot order: conversations as listed, and
/// traces in the order they appear across all conversations.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    conversations: Arc<Vec<SnapshotConversation>>,
    tools: Arc<Vec<ToolSchema>>,
}

impl SnapshotSource {
    pub async fn open(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TraceDeckError::Io(format!("failed reading {}: {e}", path.display())))?;
        let file: SnapshotFile = serde_json::from_str(&raw).map_err(|e| {
            TraceDeckError::Parse(format!("invalid snapshot {}: {e}", path.display()))
        })?;
        Ok(Self::from_file(file))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_str(raw)
            .map_err(|e| TraceDeckError::Parse(format!("invalid snapshot: {e}")))?;
        Ok(Self::from_file(file))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let file: SnapshotFile = serde_json::from_value(value)
            .map_err(|e| TraceDeckError::Parse(format!("invalid snapshot: {e}")))?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: SnapshotFile) -> Self {
        tracing::debug!(
            conversations = file.conversations.len(),
            tools = file.tools.len(),
            "loaded trace snapshot"
        );
        Self {
            conversations: Arc::new(file.conversations),
            tools: Arc::new(file.tools),
        }
    }

    fn conversation(&self, id: &ConversationId) -> Option<&SnapshotConversation> {
        self.conversations
            .iter()
            .find(|c| c.group_id == id.as_str())
    }

    fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.conversations.iter().flat_map(|c| c.traces.iter())
    }
}

impl TraceSource for SnapshotSource {
    async fn conversations(&self) -> Result<Vec<ConversationSummary>> {
        Ok(self
            .conversations
            .iter()
            .map(|c| ConversationSummary {
                group_id: c.group_id.clone(),
                started_at: c.started_at.clone(),
                instruction: c.instruction.clone(),
            })
            .collect())
    }

    async fn conversation_traces(&self, id: &ConversationId) -> Result<ConversationTraces> {
        let conversation = self
            .conversation(id)
            .ok_or_else(|| TraceDeckError::NotFound(format!("conversation {id}")))?;
        Ok(ConversationTraces {
            traces: conversation.traces.clone(),
        })
    }

    async fn conversation_neighbors(&self, id: &ConversationId) -> Result<Neighbors> {
        Ok(neighbors_of(
            self.conversations.iter().map(|c| c.group_id.as_str()),
            id.as_str(),
        ))
    }

    async fn trace_spans(&self, id: &TraceId) -> Result<Vec<SpanRecord>> {
        self.turns()
            .find(|t| t.trace_id == id.as_str())
            .map(|t| t.spans.clone())
            .ok_or_else(|| TraceDeckError::NotFound(format!("trace {id}")))
    }

    async fn trace_neighbors(&self, id: &TraceId) -> Result<Neighbors> {
        Ok(neighbors_of(
            self.turns().map(|t| t.trace_id.as_str()),
            id.as_str(),
        ))
    }

    async fn tools(&self) -> Result<Vec<ToolSchema>> {
        Ok(self.tools.to_vec())
    }
}

fn neighbors_of<'a>(ids: impl Iterator<Item = &'a str>, id: &str) -> Neighbors {
    let ids: Vec<&str> = ids.collect();
    let Some(pos) = ids.iter().position(|candidate| *candidate == id) else {
        return Neighbors::default();
    };

    Neighbors {
        previous: pos
            .checked_sub(1)
            .and_then(|i| ids.get(i))
            .map(|s| s.to_string()),
        next: ids.get(pos + 1).map(|s| s.to_string()),
    }
}
