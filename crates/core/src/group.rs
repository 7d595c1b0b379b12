use tracing::warn;

use crate::filter::filter_and_sort;
use crate::model::span::SpanRecord;
use crate::model::turn::Turn;

/// Turns ready for layout plus the denominator they share.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTurns {
    pub turns: Vec<Turn>,
    pub global_duration_ms: f64,
}

/// Filters each turn's spans and computes the cross-turn duration.
///
/// Turns keep the order the source returned them in.
pub fn group_turns(turns: Vec<Turn>) -> GroupedTurns {
    let turns: Vec<Turn> = turns
        .into_iter()
        .map(|mut turn| {
            turn.spans = filter_and_sort(std::mem::take(&mut turn.spans));
            turn
        })
        .collect();
    let global_duration_ms = global_duration(&turns);

    GroupedTurns {
        turns,
        global_duration_ms,
    }
}

/// Longest turn duration, never below zero. Turns with unparseable bounds are skipped.
pub fn global_duration(turns: &[Turn]) -> f64 {
    turns
        .iter()
        .filter_map(|turn| {
            let duration = turn.duration_ms();
            if duration.is_finite() {
                Some(duration)
            } else {
                warn!(
                    trace_id = %turn.trace_id,
                    started_at = %turn.started_at.display(),
                    ended_at = %turn.ended_at.display(),
                    "turn has unparseable bounds; excluded from global duration"
                );
                None
            }
        })
        .fold(0.0, f64::max)
}

/// Spans of a single trace laid out against their own extent.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatTrace {
    pub spans: Vec<SpanRecord>,
    /// Earliest parseable span start, `NaN` if there is none.
    pub origin_ms: f64,
    pub extent_ms: f64,
}

pub fn flatten_trace(spans: Vec<SpanRecord>) -> FlatTrace {
    let spans = filter_and_sort(spans);

    let origin_ms = spans
        .iter()
        .map(|s| s.started_at.millis())
        .filter(|ms| ms.is_finite())
        .fold(f64::NAN, f64::min);
    let end_ms = spans
        .iter()
        .map(|s| s.ended_at.millis())
        .filter(|ms| ms.is_finite())
        .fold(f64::NAN, f64::max);

    let extent_ms = end_ms - origin_ms;
    let extent_ms = if extent_ms.is_finite() {
        extent_ms.max(0.0)
    } else {
        0.0
    };

    FlatTrace {
        spans,
        origin_ms,
        extent_ms,
    }
}
