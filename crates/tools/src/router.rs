//! Action routing: action id → tool, with coercion and validation in front
//! of every handler.

use futures::FutureExt;
use genui_core::{ToolError, ToolFailure, ToolRegistry, ToolResult, is_valid_action_id};
use serde_json::{Map, Value, json};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::coerce::{coerce_params, missing_required};

/// Dispatches submitted actions to registered tools.
///
/// Every outcome, including rejection before dispatch, is a [`ToolResult`];
/// `route` never returns an error and never panics on handler faults.
#[derive(Clone)]
pub struct ToolRouter {
    registry: Arc<ToolRegistry>,
}

impl ToolRouter {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Route `action_id` with raw form `params`.
    ///
    /// Order: action-id syntax, lookup, coercion, required-parameter check,
    /// execution. A handler is never invoked when validation fails.
    pub async fn route(&self, action_id: &str, params: Map<String, Value>) -> ToolResult {
        let started = Instant::now();

        if !is_valid_action_id(action_id) {
            warn!(action_id, "Rejected malformed action id");
            return ToolResult::fail(
                action_id,
                ToolError::InvalidActionId(action_id.to_string()).into(),
                elapsed_ms(started),
            );
        }

        let Some(tool) = self.registry.get(action_id) else {
            warn!(action_id, "No tool registered for action");
            let mut failure = ToolFailure::from(ToolError::NotFound(action_id.to_string()));
            failure.details = json!({ "availableTools": self.registry.names() });
            return ToolResult::fail(action_id, failure, elapsed_ms(started));
        };

        let specs = tool.parameters();
        let params = coerce_params(&specs, params);
        let missing = missing_required(&specs, &params);
        if !missing.is_empty() {
            debug!(action_id, ?missing, "Missing required parameters");
            let provided: Vec<&String> = params.keys().collect();
            return ToolResult::fail(
                action_id,
                ToolFailure::new(
                    "VALIDATION_ERROR",
                    format!("Missing required parameters: {}", missing.join(", ")),
                    json!({ "missingRequired": missing, "provided": provided }),
                ),
                elapsed_ms(started),
            );
        }

        debug!(action_id, "Executing tool");
        let outcome = AssertUnwindSafe(tool.execute(params)).catch_unwind().await;
        let duration = elapsed_ms(started);

        match outcome {
            Ok(Ok(data)) => {
                debug!(action_id, duration_ms = duration, "Tool succeeded");
                ToolResult::ok(action_id, data, duration)
            }
            Ok(Err(ToolError::Failed {
                code,
                message,
                details,
            })) => {
                debug!(action_id, code = %code, "Tool reported failure");
                ToolResult::fail(action_id, ToolFailure::new(code, message, details), duration)
            }
            Ok(Err(err)) => {
                warn!(action_id, error = %err, "Tool execution error");
                ToolResult::fail(action_id, execution_error(action_id, err.to_string()), duration)
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!(action_id, reason = %reason, "Tool handler panicked");
                ToolResult::fail(action_id, execution_error(action_id, reason), duration)
            }
        }
    }
}

fn execution_error(tool_name: &str, error: String) -> ToolFailure {
    ToolFailure::new(
        "EXECUTION_ERROR",
        format!("Tool '{tool_name}' failed: {error}"),
        json!({ "toolName": tool_name, "error": error }),
    )
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
