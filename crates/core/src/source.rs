use futures::join;

use crate::error::Result;
use crate::ids::{ConversationId, TraceId};
use crate::model::span::SpanRecord;
use crate::model::tool::ToolSchema;
use crate::model::turn::{ConversationSummary, ConversationTraces, Neighbors};
use crate::presentation::{ConversationTimeline, TraceTimeline};

/// Supplier of trace data. Every call may fail independently of the others.
pub trait TraceSource {
    fn conversations(&self) -> impl Future<Output = Result<Vec<ConversationSummary>>> + Send;

    fn conversation_traces(
        &self,
        id: &ConversationId,
    ) -> impl Future<Output = Result<ConversationTraces>> + Send;

    fn conversation_neighbors(
        &self,
        id: &ConversationId,
    ) -> impl Future<Output = Result<Neighbors>> + Send;

    fn trace_spans(&self, id: &TraceId) -> impl Future<Output = Result<Vec<SpanRecord>>> + Send;

    fn trace_neighbors(&self, id: &TraceId) -> impl Future<Output = Result<Neighbors>> + Send;

    fn tools(&self) -> impl Future<Output = Result<Vec<ToolSchema>>> + Send;
}

/// Fetches a conversation and its neighbors concurrently.
pub async fn fetch_conversation<S: TraceSource>(
    source: &S,
    id: &ConversationId,
) -> (Result<ConversationTimeline>, Result<Neighbors>) {
    let (traces, neighbors) = join!(
        source.conversation_traces(id),
        source.conversation_neighbors(id)
    );
    (
        traces.map(|traces| ConversationTimeline::build(id, traces)),
        neighbors,
    )
}

/// Fetches a single trace and its neighbors concurrently.
pub async fn fetch_trace<S: TraceSource>(
    source: &S,
    id: &TraceId,
) -> (Result<TraceTimeline>, Result<Neighbors>) {
    let (spans, neighbors) = join!(source.trace_spans(id), source.trace_neighbors(id));
    (spans.map(|spans| TraceTimeline::build(id, spans)), neighbors)
}
