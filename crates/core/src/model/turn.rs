use serde::{Deserialize, Serialize};

use crate::model::span::SpanRecord;
use crate::time::{Timestamp, elapsed_ms};

/// One trace of a conversation with its own wall-clock bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub trace_id: String,
    #[serde(default)]
    pub started_at: Timestamp,
    #[serde(default)]
    pub ended_at: Timestamp,
    #[serde(default)]
    pub spans: Vec<SpanRecord>,
}

impl Turn {
    pub fn duration_ms(&self) -> f64 {
        elapsed_ms(&self.started_at, &self.ended_at)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConversationTraces {
    #[serde(default)]
    pub traces: Vec<Turn>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Neighbors {
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationSummary {
    #[serde(alias = "id")]
    pub group_id: String,
    #[serde(default)]
    pub started_at: Timestamp,
    #[serde(default)]
    pub instruction: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn turn_duration_from_own_bounds() {
        let turn: Turn = serde_json::from_value(json!({
            "trace_id": "t1",
            "started_at": "2026-02-01T00:00:00",
            "ended_at": "2026-02-01T00:00:02.5",
            "spans": []
        }))
        .unwrap();
        assert_eq!(turn.duration_ms(), 2500.0);
    }

    #[test]
    fn summary_accepts_id_alias() {
        let summary: ConversationSummary = serde_json::from_value(json!({
            "id": "g1",
            "started_at": "2026-02-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(summary.group_id, "g1");
        assert_eq!(summary.instruction, None);
    }

    #[test]
    fn neighbors_default_to_none() {
        let n: Neighbors = serde_json::from_value(json!({})).unwrap();
        assert_eq!(n, Neighbors::default());
    }
}
