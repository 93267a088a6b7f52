//! Transport-agnostic operation contracts.
//!
//! `submit_query` and `submit_action` take loosely typed input (as a
//! transport would hand it over), call the orchestrator, and return a
//! serialisable envelope or an [`OperationError`] with a client/server
//! category a transport can map to a status code.

use genui_core::{AgentContext, ToolResult};
use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::warn;

use crate::error::AgentError;
use crate::orchestrator::{AgentOrchestrator, ResponseType};

/// Who is at fault for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Client,
    Server,
}

/// A failed operation.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct OperationError {
    pub category: ErrorCategory,
    pub code: String,
    pub message: String,
    pub details: Value,
}

impl OperationError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            category: ErrorCategory::Client,
            code: "INVALID_REQUEST".into(),
            message: message.into(),
            details: json!({}),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.category {
            ErrorCategory::Client => 400,
            ErrorCategory::Server => 500,
        }
    }

    /// `{success: false, error: {code, message, details}}`
    pub fn to_payload(&self) -> Value {
        json!({
            "success": false,
            "error": {
                "code": self.code,
                "message": self.message,
                "details": self.details,
            }
        })
    }
}

impl From<AgentError> for OperationError {
    fn from(err: AgentError) -> Self {
        let category = if err.is_invalid_output() {
            ErrorCategory::Client
        } else {
            ErrorCategory::Server
        };
        Self {
            category,
            code: err.code().to_string(),
            message: err.to_string(),
            details: err.details(),
        }
    }
}

/// A successful operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    /// Wire form of the surface.
    pub ui: Value,
    pub context: AgentContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,
}

fn decode_context(context: Value) -> Result<AgentContext, OperationError> {
    if context.is_null() {
        return Ok(AgentContext::new());
    }
    serde_json::from_value(context)
        .map_err(|e| OperationError::invalid_request(format!("context is not a valid agent context: {e}")))
}

fn decode_form(form_data: Value) -> Result<Map<String, Value>, OperationError> {
    match form_data {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(OperationError::invalid_request(format!(
            "formData must be an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Answer a query with a `type: "ui"` envelope.
pub async fn submit_query(
    orchestrator: &AgentOrchestrator,
    query: &str,
    context: Value,
) -> Result<OperationResponse, OperationError> {
    if query.trim().is_empty() {
        return Err(OperationError::invalid_request("query must not be empty"));
    }
    let context = decode_context(context)?;
    let outcome = orchestrator
        .process(query, &context)
        .await
        .inspect_err(|e| warn!(code = e.code(), "Query failed"))?;
    Ok(OperationResponse {
        success: true,
        response_type: ResponseType::Ui,
        ui: genui_surface::to_value(&outcome.surface),
        context: outcome.context,
        tool_result: None,
    })
}

/// Run an action and return a `type: "result" | "error"` envelope.
pub async fn submit_action(
    orchestrator: &AgentOrchestrator,
    action_id: &str,
    form_data: Value,
    context: Value,
) -> Result<OperationResponse, OperationError> {
    if action_id.trim().is_empty() {
        return Err(OperationError::invalid_request("actionId must not be empty"));
    }
    let form_data = decode_form(form_data)?;
    let context = decode_context(context)?;
    let outcome = orchestrator
        .process_action(action_id, form_data, &context)
        .await
        .inspect_err(|e| warn!(action_id, code = e.code(), "Action failed"))?;
    Ok(OperationResponse {
        success: true,
        response_type: outcome.response_type,
        ui: genui_surface::to_value(&outcome.surface),
        context: outcome.context,
        tool_result: outcome.tool_result,
    })
}
