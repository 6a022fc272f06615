use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use super::tool_context::ToolContext;

/// Declared shape of one tool parameter, for the caller-facing schema.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    pub param_type: String,
    pub description: String,
    pub required: bool,
    pub default: Option<serde_json::Value>,
}

/// Build a `(name, ParameterDefinition)` pair for a tool's parameter map.
#[macro_export]
macro_rules! param {
    ($name:expr, $type:expr, $desc:expr, required) => {
        (
            $name.to_string(),
            $crate::tool::ParameterDefinition {
                param_type: $type.to_string(),
                description: $desc.to_string(),
                required: true,
                default: None,
            },
        )
    };
    ($name:expr, $type:expr, $desc:expr, optional) => {
        (
            $name.to_string(),
            $crate::tool::ParameterDefinition {
                param_type: $type.to_string(),
                description: $desc.to_string(),
                required: false,
                default: None,
            },
        )
    };
    ($name:expr, $type:expr, $desc:expr, optional, $default:expr) => {
        (
            $name.to_string(),
            $crate::tool::ParameterDefinition {
                param_type: $type.to_string(),
                description: $desc.to_string(),
                required: false,
                default: Some(::serde_json::json!($default)),
            },
        )
    };
}

/// Raw call arguments as received from the protocol layer.
#[derive(Debug, Clone, Default)]
pub struct ToolParameters {
    pub data: HashMap<String, serde_json::Value>,
}

impl ToolParameters {
    pub fn from_json(value: serde_json::Value) -> Self {
        let data = match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Self { data }
    }

    pub fn get_required<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<T> {
        let value = self
            .data
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Missing required parameter '{}'", name))?;
        serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("Invalid value for parameter '{}': {}", name, e))
    }

    pub fn get_optional<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<Option<T>> {
        match self.data.get(name) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| anyhow::anyhow!("Invalid value for parameter '{}': {}", name, e)),
        }
    }
}

/// Outcome of a tool call. Expected conditions (blocked commands, unknown
/// session ids, missing files) are success results whose content says so;
/// `error` is for genuine failures.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(content: String) -> Self {
        Self {
            success: true,
            content,
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(message),
        }
    }
}

/// One callable operation exposed to the protocol layer.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> HashMap<String, ParameterDefinition>;
    async fn execute(&self, params: ToolParameters, context: &ToolContext) -> ToolResult;
}
