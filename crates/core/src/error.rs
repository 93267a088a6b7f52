//! Error types for the genui domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; every enum that crosses a
//! public boundary exposes a stable machine-readable `code()`.

use serde_json::{Value, json};
use thiserror::Error;

/// Failures raised at the language-model provider boundary.
///
/// Rate-limit backoff is handled inside the provider; a `RateLimited`
/// error reaching the caller means the provider already gave up.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("No API key configured for provider '{provider}'")]
    MissingApiKey { provider: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("LLM connection failed: {message}")]
    Connection {
        status: Option<u16>,
        message: String,
    },

    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Provider response is not valid JSON: {message}")]
    JsonParse { message: String, raw: String },
}

impl ProviderError {
    /// Stable error code reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::MissingApiKey { .. } => "MISSING_API_KEY",
            ProviderError::RateLimited { .. } => "RATE_LIMITED",
            ProviderError::Connection { .. } => "LLM_CONNECTION",
            ProviderError::EmptyResponse => "EMPTY_RESPONSE",
            ProviderError::JsonParse { .. } => "JSON_PARSE_ERROR",
        }
    }

    /// Structured details for the error payload.
    pub fn details(&self) -> Value {
        match self {
            ProviderError::MissingApiKey { provider } => json!({ "provider": provider }),
            ProviderError::RateLimited { retry_after_secs } => {
                json!({ "retryAfter": retry_after_secs })
            }
            ProviderError::Connection { status, message } => {
                json!({ "status": status, "message": message })
            }
            ProviderError::EmptyResponse => json!({}),
            ProviderError::JsonParse { raw, .. } => json!({ "raw": raw }),
        }
    }
}

/// Failures from the tool layer.
///
/// `Failed` is a domain failure a handler reports on purpose (its code is
/// passed through to the caller unchanged); `Execution` is an unexpected
/// handler fault and surfaces as `EXECUTION_ERROR`.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid action id: '{0}'")]
    InvalidActionId(String),

    #[error("Tool already registered: {0}")]
    AlreadyRegistered(String),

    #[error("{code}: {message}")]
    Failed {
        code: String,
        message: String,
        details: Value,
    },

    #[error("Tool execution failed: {0}")]
    Execution(String),
}

impl ToolError {
    /// Shorthand for a domain failure without details.
    pub fn failed(code: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::Failed {
            code: code.into(),
            message: message.into(),
            details: json!({}),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ToolError::NotFound(_) => "TOOL_NOT_FOUND",
            ToolError::InvalidActionId(_) => "INVALID_ACTION_ID",
            ToolError::AlreadyRegistered(_) => "TOOL_ALREADY_REGISTERED",
            ToolError::Failed { code, .. } => code,
            ToolError::Execution(_) => "EXECUTION_ERROR",
        }
    }
}
