//! Session-scoped agent context.
//!
//! The context is owned by the caller and travels by value: the orchestrator
//! reads it, builds a new one, and hands that back. Serializing calls for a
//! single session is the caller's job (usually its session store).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tool::ToolResult;

/// Accumulated state for one interactive session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentContext {
    /// Append-only turn log.
    #[serde(default)]
    pub conversation_history: Vec<TurnRecord>,

    /// Wire form of the last surface handed to the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_ui: Option<Value>,

    /// The most recent form submission.
    #[serde(default)]
    pub form_data: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<ToolResult>,

    /// Retry attempts made during the most recent action.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retry_info: Vec<RetryRecord>,
}

impl AgentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of this context with `turn` appended to the history.
    pub fn with_turn(&self, turn: TurnRecord) -> Self {
        let mut next = self.clone();
        next.conversation_history.push(turn);
        next
    }

    /// The last recorded turn, if any.
    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.conversation_history.last()
    }
}

/// What kind of request produced a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnKind {
    Query {
        query: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intent: Option<String>,
    },
    Action {
        #[serde(rename = "actionId")]
        action_id: String,
    },
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: TurnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_id: Option<String>,
    /// `"result"` or `"error"` for action turns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default)]
    pub attempts: u32,
}

impl TurnRecord {
    pub fn new(kind: TurnKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
            surface_id: None,
            outcome: None,
            attempts: 0,
        }
    }

    pub fn with_surface(mut self, surface_id: impl Into<String>) -> Self {
        self.surface_id = Some(surface_id.into());
        self
    }

    pub fn with_outcome(mut self, outcome: impl Into<String>, attempts: u32) -> Self {
        self.outcome = Some(outcome.into());
        self.attempts = attempts;
        self
    }
}

/// One failed attempt folded into the context before retrying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryRecord {
    pub attempt_number: u32,
    pub observation: Value,
    pub adjustments: Map<String, Value>,
}
