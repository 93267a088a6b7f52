//! Phase prompts.
//!
//! Each model call in a turn belongs to a [`Phase`]. The generating phases
//! embed the component catalog and the wire format, so the model only ever
//! sees the seven whitelisted kinds.

use genui_core::{AgentContext, ChatRequest, ToolResult};
use genui_surface::ComponentWhitelist;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

use crate::decision::Observation;

/// How many history entries are quoted back to the model.
const HISTORY_WINDOW: usize = 5;

/// Which model call of a turn is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Reasoning,
    GeneratingUi,
    GeneratingResultUi,
    GeneratingErrorUi,
    InferringAdjustments,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Reasoning => "reasoning",
            Phase::GeneratingUi => "generating_ui",
            Phase::GeneratingResultUi => "generating_result_ui",
            Phase::GeneratingErrorUi => "generating_error_ui",
            Phase::InferringAdjustments => "inferring_adjustments",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const WIRE_FORMAT: &str = r#"{"surfaceUpdate":{"surfaceId":"<unique id>","components":[{"id":"<unique id>","component":{"<Kind>":{...properties}}}]}}"#;

fn surface_system_prompt(task: &str) -> String {
    format!(
        "You generate declarative user interfaces as JSON.\n\
         {task}\n\n\
         Respond with exactly one JSON object in this format:\n{WIRE_FORMAT}\n\n\
         Allowed component kinds (no others exist):\n{catalog}\n\
         Rules:\n\
         - Component ids are unique. A Button's child is the id of a Text component in the same list.\n\
         - Text values use {{\"literalString\": \"...\"}}; form inputs bind with {{\"path\": \"form.<field>\"}}.\n\
         - A Button's action.name must be one of the available actions.\n\
         - Never include scripts, URLs with a javascript: scheme, or event handler attributes.",
        catalog = ComponentWhitelist::catalog(),
    )
}

fn history_summary(context: &AgentContext) -> Value {
    let skip = context
        .conversation_history
        .len()
        .saturating_sub(HISTORY_WINDOW);
    Value::Array(
        context
            .conversation_history
            .iter()
            .skip(skip)
            .map(|turn| serde_json::to_value(turn).unwrap_or(Value::Null))
            .collect(),
    )
}

/// Reasoning phase: classify the request.
pub fn reasoning(query: &str, context: &AgentContext, tools: &[Value]) -> ChatRequest {
    let system = "You analyse requests for an infrastructure console. \
        Respond with a JSON object {\"intent\": string, \"requiredInfo\": [string], \"confidence\": number between 0 and 1}.";
    let user = json!({
        "query": query,
        "recentHistory": history_summary(context),
        "availableActions": tools,
    });
    ChatRequest::json(system, user.to_string())
}

/// Generating phase: build the surface answering a query.
pub fn generate_ui(
    query: &str,
    reasoning: &Value,
    context: &AgentContext,
    tools: &[Value],
) -> ChatRequest {
    let system = surface_system_prompt(
        "Build the form or view that lets the user accomplish their request.",
    );
    let user = json!({
        "query": query,
        "analysis": reasoning,
        "previousUi": context.previous_ui,
        "availableActions": tools,
    });
    ChatRequest::json(system, user.to_string())
}

/// Result phase: render a successful tool result.
pub fn generate_result_ui(action_id: &str, result: &ToolResult, context: &AgentContext) -> ChatRequest {
    let system = surface_system_prompt(
        "An action succeeded. Show its outcome, using a success Alert and a Table for lists.",
    );
    let user = json!({
        "actionId": action_id,
        "toolResult": result,
        "formData": context.form_data,
    });
    ChatRequest::json(system, user.to_string())
}

/// Error phase: render a terminal failure.
pub fn generate_error_ui(
    action_id: &str,
    error: &Value,
    attempts: u32,
    context: &AgentContext,
) -> ChatRequest {
    let system = surface_system_prompt(
        "An action failed. Explain the failure with an error Alert and offer a way to try again.",
    );
    let user = json!({
        "actionId": action_id,
        "error": error,
        "attempts": attempts,
        "formData": context.form_data,
        "previousUi": context.previous_ui,
    });
    ChatRequest::json(system, user.to_string())
}

/// Adjustment phase: ask how a failed action should be retried.
pub fn infer_adjustments(
    action_id: &str,
    form_data: &Map<String, Value>,
    observation: &Observation,
    context: &AgentContext,
) -> ChatRequest {
    let system = "An action failed. Suggest parameter adjustments for a retry. \
        Respond with a JSON object {\"adjustments\": {<parameter>: <new value>}}. \
        Use an empty object when nothing should change.";
    let user = json!({
        "actionId": action_id,
        "formData": form_data,
        "observation": observation,
        "previousAttempts": context.retry_info,
    });
    ChatRequest::json(system, user.to_string())
}
