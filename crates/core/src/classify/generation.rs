use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::probe::{display_string, first_non_empty, is_empty_value, is_meaningful, type_of};
use crate::model::content::{GenerationContent, InputMessage, OutputItem, TokenUsage};

pub const PARAMETER_KEYS: &[&str] = &[
    "temperature",
    "top_p",
    "tool_choice",
    "parallel_tool_calls",
    "max_tokens",
    "frequency_penalty",
    "presence_penalty",
];

const MODEL_KEYS: &[&str] = &["model", "provider", "engine"];
const INPUT_KEYS: &[&str] = &["input", "messages"];
const USAGE_KEYS: &[&str] = &["usage", "token_usage"];
const ROLE_KEYS: &[&str] = &["role", "author"];
const MESSAGE_CONTENT_KEYS: &[&str] = &["content", "text", "value"];
const EXCLUDED_OUTPUT_TYPES: &[&str] = &["function_call", "tool", "tool_result"];
const TEXT_SEPARATOR: &str = "\n\n";

pub(crate) fn classify_generation(data: &Map<String, Value>) -> GenerationContent {
    let envelope = response_envelope(data);

    GenerationContent {
        model: first_non_empty(data, MODEL_KEYS).map(display_string),
        parameters: extract_parameters(data),
        input_messages: extract_input(data),
        output_items: envelope.map(extract_output).unwrap_or_default(),
        error: envelope
            .and_then(|e| e.get("error"))
            .filter(|e| is_meaningful(e) && !is_empty_value(e))
            .cloned(),
        usage: extract_usage(data, envelope),
    }
}

fn extract_parameters(data: &Map<String, Value>) -> BTreeMap<String, Value> {
    let model_config = data.get("model_config").and_then(Value::as_object);

    PARAMETER_KEYS
        .iter()
        .filter_map(|key| {
            data.get(*key)
                .filter(|v| !v.is_null())
                .or_else(|| {
                    model_config
                        .and_then(|cfg| cfg.get(*key))
                        .filter(|v| !v.is_null())
                })
                .map(|v| (key.to_string(), v.clone()))
        })
        .collect()
}

fn extract_input(data: &Map<String, Value>) -> Vec<InputMessage> {
    let entries = INPUT_KEYS.iter().find_map(|key| {
        data.get(*key)
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
    });

    entries
        .map(|items| items.iter().filter_map(input_message).collect())
        .unwrap_or_default()
}

fn input_message(entry: &Value) -> Option<InputMessage> {
    let role = ROLE_KEYS
        .iter()
        .find_map(|key| entry.get(*key).filter(|v| is_meaningful(v)))
        .map(display_string)
        .unwrap_or_else(|| "user".to_string());
    if role == "tool" {
        return None;
    }

    let content = MESSAGE_CONTENT_KEYS
        .iter()
        .find_map(|key| entry.get(*key).filter(|v| !v.is_null()))
        .filter(|v| !is_empty_value(v))?;

    Some(InputMessage {
        role,
        content: content.clone(),
    })
}

/// First `output` element that looks like a response object.
fn response_envelope(data: &Map<String, Value>) -> Option<&Map<String, Value>> {
    data.get("output")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find(|candidate| {
            candidate.get("object").and_then(Value::as_str) == Some("response")
                || candidate.get("output").is_some_and(Value::is_array)
        })
}

fn extract_output(envelope: &Map<String, Value>) -> Vec<OutputItem> {
    let Some(items) = envelope.get("output").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| is_meaningful(item))
        .filter(|item| !type_of(item).is_some_and(|t| EXCLUDED_OUTPUT_TYPES.contains(&t)))
        .filter_map(output_item)
        .collect()
}

fn output_item(item: &Value) -> Option<OutputItem> {
    match type_of(item) {
        Some("reasoning") => {
            non_blank(joined_text(item, "reasoning_text")).map(|text| OutputItem::Reasoning { text })
        }
        Some("message") => {
            non_blank(joined_text(item, "output_text")).map(|text| OutputItem::Message { text })
        }
        _ => (!is_empty_value(item)).then(|| OutputItem::Raw {
            value: item.clone(),
        }),
    }
}

fn joined_text(item: &Value, part_type: &str) -> String {
    let Some(parts) = item.get("content").and_then(Value::as_array) else {
        return String::new();
    };

    parts
        .iter()
        .filter(|part| type_of(part) == Some(part_type))
        .filter_map(|part| part.get("text"))
        .filter(|text| is_meaningful(text))
        .map(display_string)
        .collect::<Vec<_>>()
        .join(TEXT_SEPARATOR)
}

fn non_blank(text: String) -> Option<String> {
    (!text.trim().is_empty()).then_some(text)
}

fn extract_usage(
    data: &Map<String, Value>,
    envelope: Option<&Map<String, Value>>,
) -> Option<TokenUsage> {
    let usage = first_non_empty(data, USAGE_KEYS).or_else(|| {
        envelope
            .and_then(|e| e.get("usage"))
            .filter(|u| !is_empty_value(u))
    })?;

    Some(TokenUsage {
        input_tokens: usage.get("input_tokens").cloned(),
        output_tokens: usage.get("output_tokens").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn classify(value: Value) -> GenerationContent {
        classify_generation(value.as_object().unwrap())
    }

    #[test]
    fn model_falls_back_through_aliases() {
        assert_eq!(
            classify(json!({"provider": "openai"})).model.as_deref(),
            Some("openai")
        );
        assert_eq!(
            classify(json!({"model": " ", "engine": "e1"})).model.as_deref(),
            Some("e1")
        );
        assert_eq!(classify(json!({})).model, None);
    }

    #[test]
    fn parameters_prefer_top_level_then_model_config() {
        let content = classify(json!({
            "temperature": null,
            "top_p": 0.9,
            "seed": 7,
            "model_config": {"temperature": 0.2, "top_p": 0.1, "max_tokens": null}
        }));
        assert_eq!(
            content.parameters,
            BTreeMap::from([
                ("temperature".to_string(), json!(0.2)),
                ("top_p".to_string(), json!(0.9)),
            ])
        );
    }

    #[test]
    fn input_uses_messages_when_input_missing_or_empty() {
        let content = classify(json!({
            "input": [],
            "messages": [{"content": "from messages"}]
        }));
        assert_eq!(
            content.input_messages,
            vec![InputMessage {
                role: "user".into(),
                content: json!("from messages")
            }]
        );
    }

    #[test]
    fn input_drops_tool_and_empty_entries() {
        let content = classify(json!({
            "input": [
                {"role": "system", "content": "be brief"},
                {"role": "tool", "content": "{\"ok\":true}"},
                {"role": "assistant", "content": "   "},
                {"role": "assistant", "content": []},
                {"author": "developer", "text": "aliased"},
                "not an object",
                {"role": "user", "content": [{"type": "input_text", "text": "hi"}]}
            ]
        }));
        let roles: Vec<_> = content
            .input_messages
            .iter()
            .map(|m| m.role.as_str())
            .collect();
        assert_eq!(roles, vec!["system", "developer", "user"]);
        assert_eq!(content.input_messages[1].content, json!("aliased"));
    }

    #[test]
    fn output_sorts_reasoning_message_and_raw() {
        let content = classify(json!({
            "output": [
                {"type": "message", "content": "ignored, not an envelope"},
                {
                    "object": "response",
                    "output": [
                        {"type": "reasoning", "content": [
                            {"type": "reasoning_text", "text": "step one"},
                            {"type": "summary_text", "text": "skip"},
                            {"type": "reasoning_text", "text": "step two"}
                        ]},
                        {"type": "function_call", "name": "lookup", "arguments": "{}"},
                        {"type": "tool_result", "output": "x"},
                        {"type": "message", "content": [
                            {"type": "output_text", "text": "hello"},
                            {"type": "output_text", "text": ""},
                            {"type": "output_text", "text": "world"}
                        ]},
                        {"type": "web_search_call", "status": "completed"},
                        {},
                        null
                    ]
                }
            ]
        }));
        assert_eq!(
            content.output_items,
            vec![
                OutputItem::Reasoning {
                    text: "step one\n\nstep two".into()
                },
                OutputItem::Message {
                    text: "hello\n\nworld".into()
                },
                OutputItem::Raw {
                    value: json!({"type": "web_search_call", "status": "completed"})
                },
            ]
        );
    }

    #[test]
    fn blank_reasoning_is_dropped() {
        let content = classify(json!({
            "output": [{"output": [
                {"type": "reasoning", "content": [{"type": "reasoning_text", "text": " "}]},
                {"type": "message", "content": "not a list"}
            ]}]
        }));
        assert!(content.output_items.is_empty());
    }

    #[test]
    fn envelope_error_surfaces_separately() {
        let content = classify(json!({
            "output": [{"object": "response", "output": [], "error": "rate limited"}]
        }));
        assert_eq!(content.error, Some(json!("rate limited")));
        assert!(content.output_items.is_empty());

        let quiet = classify(json!({
            "output": [{"object": "response", "output": [], "error": null}]
        }));
        assert_eq!(quiet.error, None);
    }

    #[test]
    fn usage_prefers_top_level_then_envelope() {
        let top = classify(json!({
            "usage": {},
            "token_usage": {"input_tokens": 1, "output_tokens": 2},
            "output": [{"object": "response", "usage": {"input_tokens": 9}}]
        }));
        assert_eq!(
            top.usage,
            Some(TokenUsage {
                input_tokens: Some(json!(1)),
                output_tokens: Some(json!(2))
            })
        );

        let nested = classify(json!({
            "output": [{"object": "response", "usage": {"input_tokens": "9"}}]
        }));
        assert_eq!(
            nested.usage,
            Some(TokenUsage {
                input_tokens: Some(json!("9")),
                output_tokens: None
            })
        );
    }
}
