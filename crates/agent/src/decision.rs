//! Observe and decide: what a tool result means for the action loop.

use genui_core::{ToolFailure, ToolResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Failure codes that end an action immediately; retrying cannot fix them.
pub const NON_RETRYABLE_CODES: [&str; 3] = ["UNAUTHORIZED", "FORBIDDEN", "NOT_FOUND"];

pub fn is_retryable(code: &str) -> bool {
    !NON_RETRYABLE_CODES.contains(&code)
}

/// What the decide step sees of one attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub success: bool,
    pub data: Option<Value>,
    pub error: Option<ToolFailure>,
    /// The error message, surfaced for the adjustment prompt.
    pub reason: Option<String>,
}

impl Observation {
    pub fn from_result(result: &ToolResult) -> Self {
        Self {
            success: result.success,
            data: result.data.clone(),
            error: result.error.clone(),
            reason: result.error.as_ref().map(|e| e.message.clone()),
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Outcome of the decide step.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Complete,
    /// Reserved. Never produced by the decide step.
    Continue,
    Retry { adjustments: Map<String, Value> },
    Error { error: ToolFailure },
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Complete => "complete",
            Decision::Continue => "continue",
            Decision::Retry { .. } => "retry",
            Decision::Error { .. } => "error",
        }
    }
}

/// The decision that needs no model call, if there is one.
///
/// `None` means the failure is retryable and adjustments must be inferred.
pub fn decide_without_model(observation: &Observation) -> Option<Decision> {
    if observation.success {
        return Some(Decision::Complete);
    }
    let error = observation.error.clone().unwrap_or_else(|| {
        ToolFailure::new(
            "EXECUTION_ERROR",
            "Tool failed without an error payload",
            Value::Object(Map::new()),
        )
    });
    if is_retryable(&error.code) {
        None
    } else {
        Some(Decision::Error { error })
    }
}
