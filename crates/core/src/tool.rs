//! Tool trait: the abstraction over action handlers.
//!
//! A tool is what a submitted form action ultimately invokes: the action id
//! on a Button names a tool in the [`ToolRegistry`]. Each tool declares its
//! parameters so the router can coerce raw form strings before dispatch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ToolError;

/// Longest accepted action id.
const MAX_ACTION_ID_LEN: usize = 64;

/// Declared type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// One declared tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
            description: String::new(),
        }
    }

    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type)
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// The error half of a [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ToolFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>, details: Value) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<ToolError> for ToolFailure {
    fn from(err: ToolError) -> Self {
        let code = err.code().to_string();
        match err {
            ToolError::Failed {
                message, details, ..
            } => ToolFailure::new(code, message, details),
            other => ToolFailure::new(code, other.to_string(), json!({})),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    /// Wall-clock execution time in milliseconds.
    #[serde(rename = "executionTime")]
    pub execution_time_ms: u64,
    #[serde(rename = "toolName")]
    pub tool_name: String,
}

/// The structured outcome of routing one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<ToolFailure>,
    pub metadata: ToolMetadata,
}

impl ToolResult {
    pub fn ok(tool_name: impl Into<String>, data: Value, execution_time_ms: u64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: ToolMetadata {
                execution_time_ms,
                tool_name: tool_name.into(),
            },
        }
    }

    pub fn fail(
        tool_name: impl Into<String>,
        failure: ToolFailure,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(failure),
            metadata: ToolMetadata {
                execution_time_ms,
                tool_name: tool_name.into(),
            },
        }
    }

    /// The error code, if this result is a failure.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

/// The core Tool trait.
///
/// Handlers receive parameters after coercion and required-field checks,
/// so `execute` may assume every required parameter is present.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique action id of this tool (e.g., "create_instance").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// Declared parameters, in display order.
    fn parameters(&self) -> Vec<ParamSpec>;

    /// Execute the tool with already-coerced parameters.
    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError>;

    /// Describe this tool for a prompt.
    fn to_definition(&self) -> Value {
        json!({
            "name": self.name(),
            "description": self.description(),
            "parameters": self.parameters(),
        })
    }
}

/// Whether `id` is a well-formed action id: lowercase ascii, digits and
/// underscores, starting with a letter.
pub fn is_valid_action_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    id.len() <= MAX_ACTION_ID_LEN
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// A registry of available tools.
///
/// Populate it once at startup, then share it behind an `Arc`. There is no
/// unregister; every read method takes `&self`, so concurrent lookups need
/// no locking. Registering after the registry has been shared is not
/// possible through an `Arc`.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Names must be valid action ids and unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name().to_string();
        if !is_valid_action_id(&name) {
            return Err(ToolError::InvalidActionId(name));
        }
        if self.tools.contains_key(&name) {
            return Err(ToolError::AlreadyRegistered(name));
        }
        tracing::debug!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All tool definitions, sorted by name.
    pub fn definitions(&self) -> Vec<Value> {
        self.names()
            .into_iter()
            .filter_map(|n| self.tools.get(n))
            .map(|t| t.to_definition())
            .collect()
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
