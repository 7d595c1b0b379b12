use testkit::{CONVERSATION_ID, malformed_conversation, sample_conversation};
use tracedeck_core::ids::{ConversationId, TraceId};
use tracedeck_core::layout::{LayoutAnomaly, MIN_BAR_PERCENT};
use tracedeck_core::model::content::{OutputItem, SpanContent};
use tracedeck_core::model::turn::ConversationTraces;
use tracedeck_core::presentation::{ConversationTimeline, TraceTimeline};

fn conversation() -> ConversationTimeline {
    let id = ConversationId::parse(CONVERSATION_ID).unwrap();
    ConversationTimeline::build(
        &id,
        ConversationTraces {
            traces: sample_conversation(),
        },
    )
}

#[test]
fn turns_share_longest_duration() {
    let timeline = conversation();
    assert_eq!(timeline.global_duration_ms, 4800.0);

    for turn in &timeline.turns {
        assert!(turn.spans.iter().all(|s| s.declared_type != "agent"));
        for span in &turn.spans {
            let expected = (span.span.duration_ms() / timeline.global_duration_ms) * 100.0;
            assert_eq!(span.layout.timeline.width_percent, expected);
        }
    }

    let first_ids: Vec<_> = timeline.turns[0]
        .spans
        .iter()
        .map(|s| s.span.id.as_str())
        .collect();
    assert_eq!(first_ids, vec!["t1-gen", "t1-call", "t1-gen2"]);
}

#[test]
fn spans_are_classified_for_display() {
    let timeline = conversation();
    let gen_span = timeline.spans().find(|s| s.span.id == "t1-gen").unwrap();
    let Some(SpanContent::Generation(content)) = &gen_span.content else {
        panic!("expected generation content");
    };
    assert_eq!(content.model.as_deref(), Some("gpt-x"));
    assert_eq!(content.input_messages.len(), 2);
    assert_eq!(
        content.output_items,
        vec![
            OutputItem::Reasoning {
                text: "Need the forecast.".into()
            },
            OutputItem::Message {
                text: "Checking.".into()
            },
        ]
    );

    let call = timeline.spans().find(|s| s.span.id == "t2-call").unwrap();
    let Some(SpanContent::Function(function)) = &call.content else {
        panic!("expected function content");
    };
    assert_eq!(function.name.as_deref(), Some("search"));
    assert_eq!(function.arguments, Some(serde_json::json!({})));
    assert_eq!(function.result, Some(serde_json::json!("")));
}

#[test]
fn malformed_timing_degrades_without_panicking() {
    let id = ConversationId::parse("conv-2").unwrap();
    let timeline = ConversationTimeline::build(
        &id,
        ConversationTraces {
            traces: malformed_conversation(),
        },
    );
    assert_eq!(timeline.global_duration_ms, 1000.0);

    let spans = &timeline.turns[0].spans;
    assert_eq!(spans[0].span.id, "t3-inverted");
    assert_eq!(spans[0].layout.timeline.width_percent, -60.0);
    assert_eq!(spans[0].layout.anomaly, Some(LayoutAnomaly::NegativeDuration));

    assert_eq!(spans[1].span.id, "t3-broken");
    assert_eq!(
        spans[1].layout.anomaly,
        Some(LayoutAnomaly::UnparseableTimestamp)
    );
    assert_eq!(spans[1].layout.bar.width_percent, MIN_BAR_PERCENT);
}

#[test]
fn single_trace_uses_span_extent() {
    let spans = sample_conversation().remove(1).spans;
    let timeline = TraceTimeline::build(&TraceId::parse("trace-2").unwrap(), spans);
    assert_eq!(timeline.extent_ms, 4600.0);
    assert_eq!(timeline.spans.len(), 2);
    assert_eq!(timeline.summary.function_count, 1);
}
