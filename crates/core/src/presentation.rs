//! Render-ready models handed to the terminal and JSON printers.

use serde::Serialize;

use crate::classify::classify_span;
use crate::group::{flatten_trace, group_turns};
use crate::ids::{ConversationId, TraceId};
use crate::layout::{SpanLayout, layout_span};
use crate::model::content::SpanContent;
use crate::model::span::{FUNCTION_SPAN_TYPE, GENERATION_SPAN_TYPE, SpanRecord, display_name};
use crate::model::turn::{ConversationTraces, Turn};
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanView {
    /// The record as received; `span_data` backs the raw JSON view.
    pub span: SpanRecord,
    pub declared_type: String,
    pub label: String,
    pub layout: SpanLayout,
    pub content: Option<SpanContent>,
}

impl SpanView {
    pub fn build(span: SpanRecord, origin_ms: f64, global_duration_ms: f64) -> Self {
        let declared_type = span.declared_type().unwrap_or_default().to_string();
        let label = display_name(&declared_type).to_string();
        let layout = layout_span(&span, origin_ms, global_duration_ms);
        let content = classify_span(&span);

        Self {
            span,
            declared_type,
            label,
            layout,
            content,
        }
    }

    /// Tool name for function spans, model for generations.
    pub fn subject(&self) -> Option<&str> {
        match &self.content {
            Some(SpanContent::Function(f)) => f.name.as_deref(),
            Some(SpanContent::Generation(g)) => g.model.as_deref(),
            None => self.span.function_name(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TurnSummary {
    pub span_count: usize,
    pub generation_count: usize,
    pub function_count: usize,
    /// Sum of finite span durations.
    pub span_time_ms: f64,
    /// Sum of finite, unfloored bar widths.
    pub span_time_percent: f64,
}

impl TurnSummary {
    pub fn from_spans(spans: &[SpanView]) -> Self {
        let count_of = |kind: &str| spans.iter().filter(|s| s.declared_type == kind).count();

        Self {
            span_count: spans.len(),
            generation_count: count_of(GENERATION_SPAN_TYPE),
            function_count: count_of(FUNCTION_SPAN_TYPE),
            span_time_ms: spans
                .iter()
                .map(|s| s.span.duration_ms())
                .filter(|ms| ms.is_finite())
                .sum(),
            span_time_percent: spans
                .iter()
                .map(|s| s.layout.timeline.width_percent)
                .filter(|pct| pct.is_finite())
                .sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnView {
    pub index: usize,
    pub trace_id: String,
    pub started_at: Timestamp,
    pub ended_at: Timestamp,
    pub duration_ms: f64,
    pub spans: Vec<SpanView>,
    pub summary: TurnSummary,
}

impl TurnView {
    fn build(index: usize, turn: Turn, global_duration_ms: f64) -> Self {
        let origin_ms = turn.started_at.millis();
        let duration_ms = turn.duration_ms();
        let spans: Vec<SpanView> = turn
            .spans
            .into_iter()
            .map(|span| SpanView::build(span, origin_ms, global_duration_ms))
            .collect();
        let summary = TurnSummary::from_spans(&spans);

        Self {
            index,
            trace_id: turn.trace_id,
            started_at: turn.started_at,
            ended_at: turn.ended_at,
            duration_ms,
            spans,
            summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationTimeline {
    pub conversation_id: String,
    pub global_duration_ms: f64,
    pub turns: Vec<TurnView>,
}

impl ConversationTimeline {
    pub fn build(conversation_id: &ConversationId, traces: ConversationTraces) -> Self {
        let grouped = group_turns(traces.traces);
        let global_duration_ms = grouped.global_duration_ms;
        let turns = grouped
            .turns
            .into_iter()
            .enumerate()
            .map(|(index, turn)| TurnView::build(index, turn, global_duration_ms))
            .collect();

        Self {
            conversation_id: conversation_id.to_string(),
            global_duration_ms,
            turns,
        }
    }

    pub fn spans(&self) -> impl Iterator<Item = &SpanView> {
        self.turns.iter().flat_map(|turn| turn.spans.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceTimeline {
    pub trace_id: String,
    pub extent_ms: f64,
    pub spans: Vec<SpanView>,
    pub summary: TurnSummary,
}

impl TraceTimeline {
    pub fn build(trace_id: &TraceId, spans: Vec<SpanRecord>) -> Self {
        let flat = flatten_trace(spans);
        let spans: Vec<SpanView> = flat
            .spans
            .into_iter()
            .map(|span| SpanView::build(span, flat.origin_ms, flat.extent_ms))
            .collect();
        let summary = TurnSummary::from_spans(&spans);

        Self {
            trace_id: trace_id.to_string(),
            extent_ms: flat.extent_ms,
            spans,
            summary,
        }
    }

    pub fn span(&self, span_id: &str) -> Option<&SpanView> {
        self.spans.iter().find(|s| s.span.id == span_id)
    }
}
