use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool the agent can call, as advertised by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "parameters")]
    pub params_json_schema: Value,
}

impl ToolSchema {
    /// Top-level parameter names with their declared types.
    pub fn parameters(&self) -> Vec<(&str, &str)> {
        let Some(properties) = self
            .params_json_schema
            .get("properties")
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        properties
            .iter()
            .map(|(name, schema)| {
                let kind = schema.get("type").and_then(Value::as_str).unwrap_or("any");
                (name.as_str(), kind)
            })
            .collect()
    }

    pub fn is_required(&self, parameter: &str) -> bool {
        self.params_json_schema
            .get("required")
            .and_then(Value::as_array)
            .is_some_and(|names| names.iter().any(|n| n.as_str() == Some(parameter)))
    }
}
