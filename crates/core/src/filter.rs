use std::cmp::Ordering;

use crate::model::span::{AGENT_SPAN_TYPE, SpanRecord};

/// Drops administrative and untyped spans, then orders by start time.
///
/// The sort is stable. Spans whose `started_at` cannot be parsed go last, in
/// the order they arrived.
pub fn filter_and_sort(spans: Vec<SpanRecord>) -> Vec<SpanRecord> {
    let mut keyed: Vec<(f64, SpanRecord)> = spans
        .into_iter()
        .filter(is_displayable)
        .map(|span| (span.started_at.millis(), span))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_start(*a, *b));
    keyed.into_iter().map(|(_, span)| span).collect()
}

pub fn is_displayable(span: &SpanRecord) -> bool {
    span.declared_type()
        .is_some_and(|declared| declared != AGENT_SPAN_TYPE)
}

fn compare_start(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}
