use chrono::SecondsFormat;
use owo_colors::OwoColorize;
use serde_json::Value;
use tracedeck_core::layout::BarGeometry;
use tracedeck_core::model::content::{FunctionContent, GenerationContent, OutputItem, SpanContent};
use tracedeck_core::model::span::{FUNCTION_SPAN_TYPE, GENERATION_SPAN_TYPE};
use tracedeck_core::model::tool::ToolSchema;
use tracedeck_core::model::turn::{ConversationSummary, Neighbors};
use tracedeck_core::presentation::{ConversationTimeline, SpanView, TraceTimeline, TurnSummary};
use tracedeck_core::time::{Timestamp, format_short_duration};
use tracedeck_core::view::{SpanViewState, ViewMode};

const BODY_INDENT: &str = "      ";

pub struct Printer {
    pub track_width: usize,
    pub color: bool,
}

pub fn print_conversations_human(list: &[ConversationSummary]) {
    for item in list {
        println!(
            "{} {} | {}",
            item.group_id,
            timestamp_label(&item.started_at),
            item.instruction.as_deref().unwrap_or("-")
        );
    }
    println!("-- {} conversations --", list.len());
}

pub fn print_tools_human(tools: &[ToolSchema]) {
    for tool in tools {
        for line in tool_lines(tool) {
            println!("{line}");
        }
    }
    println!("-- {} tools --", tools.len());
}

fn tool_lines(tool: &ToolSchema) -> Vec<String> {
    let description = tool.description.trim();
    let mut lines = vec![format!(
        "{} | {}",
        tool.name,
        if description.is_empty() { "-" } else { description }
    )];
    for (name, kind) in tool.parameters() {
        let required = if tool.is_required(name) { " (required)" } else { "" };
        lines.push(format!("    {name}: {kind}{required}"));
    }
    lines
}

pub fn print_conversation_human(
    printer: &Printer,
    timeline: &ConversationTimeline,
    neighbors: Option<&Neighbors>,
    toggles: &SpanViewState,
) {
    println!(
        "CONVERSATION {} turns={} longest={}",
        timeline.conversation_id,
        timeline.turns.len(),
        format_short_duration(timeline.global_duration_ms)
    );
    println!("{}", neighbors_line(neighbors));

    for turn in &timeline.turns {
        println!(
            "TURN {} trace={} started={} duration={} {}",
            turn.index + 1,
            turn.trace_id,
            timestamp_label(&turn.started_at),
            duration_label(turn.duration_ms),
            summary_label(&turn.summary)
        );
        for span in &turn.spans {
            print_span_row(printer, span, toggles);
        }
    }
}

pub fn print_trace_human(
    printer: &Printer,
    timeline: &TraceTimeline,
    neighbors: Option<&Neighbors>,
    toggles: &SpanViewState,
) {
    println!(
        "TRACE {} duration={} {}",
        timeline.trace_id,
        format_short_duration(timeline.extent_ms),
        summary_label(&timeline.summary)
    );
    println!("{}", neighbors_line(neighbors));
    for span in &timeline.spans {
        print_span_row(printer, span, toggles);
    }
}

pub fn print_span_human(printer: &Printer, span: &SpanView, mode: ViewMode) {
    println!(
        "SPAN {} type={} trace={} duration={}",
        span.span.id,
        span.declared_type,
        span.span.trace_id,
        duration_label(span.span.duration_ms())
    );
    println!(
        "started={} ended={}",
        timestamp_label(&span.span.started_at),
        timestamp_label(&span.span.ended_at)
    );
    for line in span_body_lines(span, mode) {
        println!("{}", paint_body(printer, &line));
    }
}

fn print_span_row(printer: &Printer, span: &SpanView, toggles: &SpanViewState) {
    let expanded = toggles.is_expanded(&span.span.id);
    let marker = if expanded { "v" } else { ">" };
    let track = render_track(&span.layout.bar, printer.track_width);
    let track = if printer.color {
        match span.declared_type.as_str() {
            GENERATION_SPAN_TYPE => track.cyan().to_string(),
            FUNCTION_SPAN_TYPE => track.yellow().to_string(),
            _ => track.magenta().to_string(),
        }
    } else {
        track
    };
    let anomaly = span
        .layout
        .anomaly
        .map(|a| format!(" !{}", a.as_str()))
        .unwrap_or_default();

    println!(
        "  {marker} {:<16} {:<20} {:>8} |{track}| {}{anomaly}",
        span.label,
        truncate(span.subject().unwrap_or("-"), 20),
        duration_label(span.span.duration_ms()),
        span.span.id
    );

    if expanded {
        for line in span_body_lines(span, toggles.view_mode(&span.span.id)) {
            println!("{BODY_INDENT}{}", paint_body(printer, &line));
        }
    }
}

fn paint_body(printer: &Printer, line: &str) -> String {
    if printer.color && line.ends_with(':') && !line.starts_with(' ') {
        line.bold().to_string()
    } else {
        line.to_string()
    }
}

/// Draws a bar on a `width`-column track: `┃` marks the start and end cells.
pub fn render_track(bar: &BarGeometry, width: usize) -> String {
    let width = width.max(1);
    let cell = |pct: f64| ((pct.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;

    let start = cell(bar.left_percent).min(width - 1);
    let end = cell(bar.end_percent).clamp(start + 1, width);

    (0..width)
        .map(|i| {
            if i == start || i + 1 == end {
                '┃'
            } else if i > start && i < end {
                '━'
            } else {
                '·'
            }
        })
        .collect()
}

pub fn neighbors_line(neighbors: Option<&Neighbors>) -> String {
    match neighbors {
        Some(n) => format!(
            "previous={} next={}",
            n.previous.as_deref().unwrap_or("-"),
            n.next.as_deref().unwrap_or("-")
        ),
        None => "previous=- next=- (navigation unavailable)".to_string(),
    }
}

/// Lines for an expanded span, without indentation.
pub fn span_body_lines(span: &SpanView, mode: ViewMode) -> Vec<String> {
    let mut lines = match (mode, &span.content) {
        (ViewMode::Pretty, Some(SpanContent::Generation(g))) => generation_lines(g),
        (ViewMode::Pretty, Some(SpanContent::Function(f))) => function_lines(f),
        _ => json_lines(&Value::Object(span.span.span_data.clone())),
    };
    if let Some(error) = &span.span.error
        && mode == ViewMode::Pretty
    {
        lines.push("span error:".to_string());
        lines.extend(indented(&value_text(error)));
    }
    lines
}

fn generation_lines(g: &GenerationContent) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(model) = &g.model {
        lines.push(format!("model: {model}"));
    }
    if !g.parameters.is_empty() {
        let params: Vec<String> = g
            .parameters
            .iter()
            .map(|(k, v)| format!("{k}={}", compact(v)))
            .collect();
        lines.push(format!("parameters: {}", params.join(" ")));
    }
    if !g.input_messages.is_empty() {
        lines.push("input:".to_string());
        for message in &g.input_messages {
            let text = value_text(&message.content);
            let mut body = text.lines();
            let first = body.next().unwrap_or_default();
            lines.push(format!("  [{}] {first}", message.role));
            lines.extend(body.map(|l| format!("    {l}")));
        }
    }
    for item in &g.output_items {
        match item {
            OutputItem::Reasoning { text } => {
                lines.push("reasoning:".to_string());
                lines.extend(indented(text));
            }
            OutputItem::Message { text } => {
                lines.push("output:".to_string());
                lines.extend(indented(text));
            }
            OutputItem::Raw { value } => {
                lines.push("output (raw):".to_string());
                lines.extend(indented(&value_text(value)));
            }
        }
    }
    if let Some(error) = &g.error {
        lines.push("error:".to_string());
        lines.extend(indented(&value_text(error)));
    }
    if let Some(usage) = &g.usage {
        lines.push(format!(
            "usage: input={} output={}",
            usage.input_tokens.as_ref().map(compact).unwrap_or_else(|| "-".into()),
            usage.output_tokens.as_ref().map(compact).unwrap_or_else(|| "-".into())
        ));
    }
    lines
}

fn function_lines(f: &FunctionContent) -> Vec<String> {
    let mut lines = vec![format!("tool: {}", f.name.as_deref().unwrap_or("-"))];
    if let Some(arguments) = &f.arguments {
        lines.push("arguments:".to_string());
        lines.extend(indented(&value_text(arguments)));
    }
    if let Some(result) = &f.result {
        lines.push("result:".to_string());
        lines.extend(indented(&value_text(result)));
    }
    lines
}

fn json_lines(value: &Value) -> Vec<String> {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|_| value.to_string())
        .lines()
        .map(str::to_string)
        .collect()
}

fn indented(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec!["  \"\"".to_string()];
    }
    text.lines().map(|l| format!("  {l}")).collect()
}

/// Strings print as-is; JSON encoded strings are pretty-printed.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ (Value::Object(_) | Value::Array(_))) => {
                serde_json::to_string_pretty(&parsed).unwrap_or_else(|_| s.clone())
            }
            _ => s.clone(),
        },
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn summary_label(summary: &TurnSummary) -> String {
    format!(
        "spans={} generations={} tools={} span_time={} ({:.1}%)",
        summary.span_count,
        summary.generation_count,
        summary.function_count,
        format_short_duration(summary.span_time_ms),
        summary.span_time_percent
    )
}

fn duration_label(ms: f64) -> String {
    if ms.is_finite() {
        format_short_duration(ms)
    } else {
        "?".to_string()
    }
}

fn timestamp_label(ts: &Timestamp) -> String {
    ts.parse()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ts.display())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tracedeck_core::layout::TimelineLayout;
    use tracedeck_core::model::span::SpanRecord;

    use super::*;

    fn bar(left: f64, width: f64) -> BarGeometry {
        TimelineLayout {
            left_percent: left,
            width_percent: width,
        }
        .geometry()
    }

    #[test]
    fn tool_lines_list_parameters() {
        let tool: ToolSchema = serde_json::from_value(json!({
            "name": "get_weather",
            "description": " Current weather ",
            "params_json_schema": {
                "properties": {"city": {"type": "string"}, "days": {"type": "integer"}},
                "required": ["city"]
            }
        }))
        .unwrap();
        assert_eq!(
            tool_lines(&tool),
            vec![
                "get_weather | Current weather",
                "    city: string (required)",
                "    days: integer",
            ]
        );

        let bare: ToolSchema = serde_json::from_value(json!({"name": "noop"})).unwrap();
        assert_eq!(tool_lines(&bare), vec!["noop | -"]);
    }

    fn view(span_type: &str, span_data: Value) -> SpanView {
        let span: SpanRecord = serde_json::from_value(json!({
            "id": "s1",
            "trace_id": "t1",
            "span_type": span_type,
            "started_at": "2026-02-01T00:00:00Z",
            "ended_at": "2026-02-01T00:00:01Z",
            "span_data": span_data,
        }))
        .unwrap();
        SpanView::build(span, 0.0, 1000.0)
    }

    #[test]
    fn track_places_bar_proportionally() {
        assert_eq!(render_track(&bar(25.0, 50.0), 8), "··┃━━┃··");
        assert_eq!(render_track(&bar(0.0, 100.0), 4), "┃━━┃");
    }

    #[test]
    fn tiny_and_degenerate_bars_stay_visible() {
        assert_eq!(render_track(&bar(50.0, 0.0), 4), "··┃·");
        assert_eq!(render_track(&bar(f64::NAN, f64::NAN), 4), "┃···");
        assert_eq!(render_track(&bar(100.0, 10.0), 4), "···┃");
    }

    #[test]
    fn neighbors_render_dashes() {
        let n = Neighbors {
            previous: None,
            next: Some("c2".into()),
        };
        assert_eq!(neighbors_line(Some(&n)), "previous=- next=c2");
        assert!(neighbors_line(None).starts_with("previous=- next=-"));
    }

    #[test]
    fn function_body_pretty_and_json() {
        let span = view(
            "function",
            json!({"name": "lookup", "arguments": "{\"q\":\"x\"}", "output": ""}),
        );
        let pretty = span_body_lines(&span, ViewMode::Pretty);
        assert_eq!(pretty[0], "tool: lookup");
        assert!(pretty.contains(&"    \"q\": \"x\"".to_string()));
        assert!(pretty.contains(&"result:".to_string()));

        let raw = span_body_lines(&span, ViewMode::Json);
        assert_eq!(raw.first().map(String::as_str), Some("{"));
        assert!(raw.iter().any(|l| l.contains("\"name\": \"lookup\"")));
    }

    #[test]
    fn generation_body_lists_sections() {
        let span = view(
            "generation",
            json!({
                "model": "gpt-x",
                "temperature": 0.7,
                "input": [{"role": "user", "content": "hi"}],
                "output": [{"object": "response", "output": [
                    {"type": "message", "content": [{"type": "output_text", "text": "hello"}]}
                ], "usage": {"input_tokens": 5, "output_tokens": 3}}]
            }),
        );
        let lines = span_body_lines(&span, ViewMode::Pretty);
        assert_eq!(
            lines,
            vec![
                "model: gpt-x",
                "parameters: temperature=0.7",
                "input:",
                "  [user] hi",
                "output:",
                "  hello",
                "usage: input=5 output=3",
            ]
        );
    }

    #[test]
    fn unclassified_spans_show_raw_payload() {
        let span = view("handoff", json!({"to": "billing"}));
        let lines = span_body_lines(&span, ViewMode::Pretty);
        assert!(lines.iter().any(|l| l.contains("\"to\": \"billing\"")));
    }

    #[test]
    fn long_subjects_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
