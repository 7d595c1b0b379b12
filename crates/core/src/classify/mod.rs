//! Span content classifier.
//!
//! Turns an untyped `span_data` payload into a [`SpanContent`]. Each canonical
//! field is filled by a prioritized chain of alias probes, so payloads from
//! different producers land in the same display model. The classifier never
//! fails: a shape it does not recognize yields `None` and the caller shows the
//! raw payload instead.

mod function;
mod generation;
pub mod probe;

use serde_json::{Map, Value};

pub use generation::PARAMETER_KEYS;

use crate::model::content::SpanContent;
use crate::model::span::{FUNCTION_SPAN_TYPE, GENERATION_SPAN_TYPE, SpanRecord};

pub fn classify(span_type: &str, span_data: &Map<String, Value>) -> Option<SpanContent> {
    match span_type {
        GENERATION_SPAN_TYPE => Some(SpanContent::Generation(
            generation::classify_generation(span_data),
        )),
        FUNCTION_SPAN_TYPE => Some(SpanContent::Function(function::classify_function(
            span_data,
        ))),
        _ => None,
    }
}

/// Classifies using the span's declared type.
pub fn classify_span(span: &SpanRecord) -> Option<SpanContent> {
    classify(span.declared_type()?, &span.span_data)
}
