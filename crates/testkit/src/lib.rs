use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{Map, Value, json};
use tracedeck_core::model::span::SpanRecord;
use tracedeck_core::model::tool::ToolSchema;
use tracedeck_core::model::turn::{ConversationSummary, Turn};
use tracedeck_core::time::Timestamp;

pub const CONVERSATION_ID: &str = "conv-1";
pub const SECOND_CONVERSATION_ID: &str = "conv-2";

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
}

pub fn at(ms: i64) -> DateTime<Utc> {
    base_time() + Duration::milliseconds(ms)
}

pub fn span(
    trace_id: &str,
    id: &str,
    span_type: &str,
    start_ms: i64,
    end_ms: i64,
    span_data: Value,
) -> SpanRecord {
    SpanRecord {
        id: id.to_string(),
        trace_id: trace_id.to_string(),
        parent_id: None,
        started_at: at(start_ms).into(),
        ended_at: at(end_ms).into(),
        span_type: Some(span_type.to_string()),
        span_data: match span_data {
            Value::Object(map) => map,
            _ => Map::new(),
        },
        error: None,
    }
}

pub fn turn(trace_id: &str, start_ms: i64, end_ms: i64, spans: Vec<SpanRecord>) -> Turn {
    Turn {
        trace_id: trace_id.to_string(),
        started_at: at(start_ms).into(),
        ended_at: at(end_ms).into(),
        spans,
    }
}

pub fn generation_data(model: &str, prompt: &str, reply: &str) -> Value {
    json!({
        "model": model,
        "temperature": 0.7,
        "input": [
            {"role": "system", "content": "You are a weather assistant."},
            {"role": "user", "content": prompt}
        ],
        "output": [{
            "object": "response",
            "output": [
                {"type": "reasoning", "content": [{"type": "reasoning_text", "text": "Need the forecast."}]},
                {"type": "message", "content": [{"type": "output_text", "text": reply}]}
            ],
            "usage": {"input_tokens": 42, "output_tokens": 7}
        }]
    })
}

/// Two turns: 1.2s and 4.8s long, so the second sets the global duration.
pub fn sample_conversation() -> Vec<Turn> {
    let t1 = "trace-1";
    let t2 = "trace-2";
    vec![
        turn(
            t1,
            0,
            1200,
            vec![
                span(t1, "t1-agent", "agent", 0, 1200, json!({"name": "Weather agent"})),
                span(
                    t1,
                    "t1-gen",
                    "generation",
                    50,
                    700,
                    generation_data("gpt-x", "Weather in Oslo?", "Checking."),
                ),
                span(
                    t1,
                    "t1-call",
                    "function",
                    700,
                    900,
                    json!({"name": "get_weather", "arguments": {"city": "Oslo"}, "output": "{\"temp\":3}"}),
                ),
                span(
                    t1,
                    "t1-gen2",
                    "generation",
                    900,
                    1150,
                    generation_data("gpt-x", "Weather in Oslo?", "It is 3 degrees."),
                ),
            ],
        ),
        turn(
            t2,
            5000,
            9800,
            vec![
                span(t2, "t2-agent", "agent", 5000, 9800, json!({})),
                span(
                    t2,
                    "t2-gen",
                    "generation",
                    5000,
                    7000,
                    json!({"provider": "local", "messages": [{"author": "user", "text": "And tomorrow?"}]}),
                ),
                span(
                    t2,
                    "t2-call",
                    "function",
                    7000,
                    9600,
                    json!({"tool": "search", "args": {}, "result": ""}),
                ),
            ],
        ),
    ]
}

/// A conversation with broken timing: one inverted span, one unparseable start.
pub fn malformed_conversation() -> Vec<Turn> {
    let t3 = "trace-3";
    let mut broken = span(t3, "t3-broken", "function", 0, 100, json!({"name": "noop"}));
    broken.started_at = Timestamp::from("not a time");

    vec![turn(
        t3,
        60_000,
        61_000,
        vec![
            span(t3, "t3-inverted", "generation", 60_800, 60_200, json!({"model": "m"})),
            broken,
        ],
    )]
}

pub fn conversation_summaries() -> Vec<ConversationSummary> {
    vec![
        ConversationSummary {
            group_id: CONVERSATION_ID.to_string(),
            started_at: at(0).into(),
            instruction: Some("What's the weather in Oslo?".to_string()),
        },
        ConversationSummary {
            group_id: SECOND_CONVERSATION_ID.to_string(),
            started_at: at(60_000).into(),
            instruction: None,
        },
    ]
}

pub fn sample_tools() -> Vec<ToolSchema> {
    vec![
        ToolSchema {
            name: "get_weather".to_string(),
            description: "Current weather for a city".to_string(),
            params_json_schema: json!({
                "type": "object",
                "properties": {"city": {"type": "string"}, "units": {"type": "string"}},
                "required": ["city"]
            }),
        },
        ToolSchema {
            name: "search".to_string(),
            description: "Search the web".to_string(),
            params_json_schema: json!({}),
        },
    ]
}

pub fn sample_snapshot() -> Value {
    let summaries = conversation_summaries();
    let traces = [sample_conversation(), malformed_conversation()];

    let conversations: Vec<Value> = summaries
        .iter()
        .zip(traces.iter())
        .map(|(summary, turns)| {
            json!({
                "group_id": summary.group_id,
                "started_at": summary.started_at,
                "instruction": summary.instruction,
                "traces": turns,
            })
        })
        .collect();

    json!({ "conversations": conversations, "tools": sample_tools() })
}

pub fn write_snapshot(dir: &Path) -> anyhow::Result<PathBuf> {
    let path = dir.join("snapshot.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&sample_snapshot())?)?;
    Ok(path)
}
