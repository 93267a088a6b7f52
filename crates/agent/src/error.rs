//! Orchestrator failures.

use genui_core::ProviderError;
use genui_surface::ValidationError;
use serde_json::{Value, json};
use thiserror::Error;

use crate::prompts::Phase;

/// Why a turn could not produce a surface.
///
/// Tool failures never appear here: they are observed and decided on, and
/// end up rendered as an error surface.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The model produced a surface the validator rejected. Never retried.
    #[error("Invalid model output during {phase}: {source}")]
    InvalidModelOutput {
        phase: Phase,
        source: ValidationError,
    },

    #[error("Provider failure during {phase}: {source}")]
    Provider { phase: Phase, source: ProviderError },

    /// A broken orchestrator contract, e.g. an illegal state transition.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// The underlying stable code: the validator's or provider's own code.
    pub fn code(&self) -> &'static str {
        match self {
            AgentError::InvalidModelOutput { source, .. } => source.code(),
            AgentError::Provider { source, .. } => source.code(),
            AgentError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            AgentError::InvalidModelOutput { phase, .. } | AgentError::Provider { phase, .. } => {
                Some(*phase)
            }
            AgentError::Internal(_) => None,
        }
    }

    pub fn details(&self) -> Value {
        match self {
            AgentError::InvalidModelOutput { phase, source } => {
                let mut details = source.details();
                details["phase"] = json!(phase.as_str());
                details
            }
            AgentError::Provider { phase, source } => {
                let mut details = source.details();
                details["phase"] = json!(phase.as_str());
                details
            }
            AgentError::Internal(_) => json!({}),
        }
    }

    /// True when the model's output, not the infrastructure, was at fault.
    pub fn is_invalid_output(&self) -> bool {
        matches!(self, AgentError::InvalidModelOutput { .. })
    }
}
