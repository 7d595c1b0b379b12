//! Concrete [`TraceSource`] implementations.

pub mod http;
pub mod snapshot;

use tracedeck_core::Result;
use tracedeck_core::config::Config;
use tracedeck_core::ids::{ConversationId, TraceId};
use tracedeck_core::model::span::SpanRecord;
use tracedeck_core::model::tool::ToolSchema;
use tracedeck_core::model::turn::{ConversationSummary, ConversationTraces, Neighbors};
use tracedeck_core::source::TraceSource;

pub use http::{HttpSourceConfig, HttpTraceSource};
pub use snapshot::SnapshotSource;

/// The source selected by configuration: a snapshot file when one is set, HTTP otherwise.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    Http(HttpTraceSource),
    Snapshot(SnapshotSource),
}

impl ConfiguredSource {
    pub async fn from_config(cfg: &Config) -> Result<Self> {
        match &cfg.source_file {
            Some(path) => Ok(Self::Snapshot(SnapshotSource::open(path).await?)),
            None => Ok(Self::Http(HttpTraceSource::new(HttpSourceConfig::from(
                cfg,
            ))?)),
        }
    }
}

impl TraceSource for ConfiguredSource {
    async fn conversations(&self) -> Result<Vec<ConversationSummary>> {
        match self {
            Self::Http(s) => s.conversations().await,
            Self::Snapshot(s) => s.conversations().await,
        }
    }

    async fn conversation_traces(&self, id: &ConversationId) -> Result<ConversationTraces> {
        match self {
            Self::Http(s) => s.conversation_traces(id).await,
            Self::Snapshot(s) => s.conversation_traces(id).await,
        }
    }

    async fn conversation_neighbors(&self, id: &ConversationId) -> Result<Neighbors> {
        match self {
            Self::Http(s) => s.conversation_neighbors(id).await,
            Self::Snapshot(s) => s.conversation_neighbors(id).await,
        }
    }

    async fn trace_spans(&self, id: &TraceId) -> Result<Vec<SpanRecord>> {
        match self {
            Self::Http(s) => s.trace_spans(id).await,
            Self::Snapshot(s) => s.trace_spans(id).await,
        }
    }

    async fn trace_neighbors(&self, id: &TraceId) -> Result<Neighbors> {
        match self {
            Self::Http(s) => s.trace_neighbors(id).await,
            Self::Snapshot(s) => s.trace_neighbors(id).await,
        }
    }

    async fn tools(&self) -> Result<Vec<ToolSchema>> {
        match self {
            Self::Http(s) => s.tools().await,
            Self::Snapshot(s) => s.tools().await,
        }
    }
}
