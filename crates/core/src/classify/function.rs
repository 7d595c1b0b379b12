use serde_json::{Map, Value};

use super::probe::{display_string, first_meaningful_or_present, first_non_empty};
use crate::model::content::FunctionContent;

const NAME_KEYS: &[&str] = &["name", "tool", "function", "func"];
const ARGUMENT_KEYS: &[&str] = &["arguments", "args", "input"];
const RESULT_KEYS: &[&str] = &["output", "result", "return_value", "response"];

// An empty tool result is still a result, so arguments and result are kept
// when present even if empty.
pub(crate) fn classify_function(data: &Map<String, Value>) -> FunctionContent {
    FunctionContent {
        name: first_non_empty(data, NAME_KEYS).map(display_string),
        arguments: first_meaningful_or_present(data, ARGUMENT_KEYS).cloned(),
        result: first_meaningful_or_present(data, RESULT_KEYS).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn classify(value: Value) -> FunctionContent {
        classify_function(value.as_object().unwrap())
    }

    #[test]
    fn aliases_are_probed_in_order() {
        let content = classify(json!({
            "tool": "get_state",
            "args": {"entity_id": "light.kitchen"},
            "return_value": "on"
        }));
        assert_eq!(content.name.as_deref(), Some("get_state"));
        assert_eq!(content.arguments, Some(json!({"entity_id": "light.kitchen"})));
        assert_eq!(content.result, Some(json!("on")));
    }

    #[test]
    fn empty_result_is_shown_missing_is_not() {
        let content = classify(json!({"name": "noop", "output": ""}));
        assert_eq!(content.result, Some(json!("")));
        assert_eq!(content.arguments, None);
    }

    #[test]
    fn non_empty_alias_beats_earlier_empty_one() {
        let content = classify(json!({"output": "", "result": "done", "arguments": {}}));
        assert_eq!(content.result, Some(json!("done")));
        assert_eq!(content.arguments, Some(json!({})));
    }

    #[test]
    fn non_string_name_is_encoded() {
        let content = classify(json!({"function": {"name": "x"}}));
        assert_eq!(content.name.as_deref(), Some("{\"name\":\"x\"}"));
    }
}
