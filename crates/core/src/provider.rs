//! Provider trait: the abstraction over language-model backends.
//!
//! The orchestrator only ever needs one thing from a model: send a system
//! prompt and a user prompt, get a decoded JSON document back. Transport
//! concerns (auth, rate-limit backoff, code-fence stripping) stay behind
//! this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// The shape the caller expects the model to answer in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// A single JSON object.
    #[default]
    Json,
    /// Free text, wrapped by the provider as a JSON string.
    Text,
}

/// A single chat round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_prompt: String,

    #[serde(default)]
    pub response_format: ResponseFormat,

    /// Overrides the provider's default temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// A JSON-mode request with provider defaults.
    pub fn json(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            response_format: ResponseFormat::Json,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// The core provider trait.
///
/// Implementations return the model's answer already decoded. Failures are
/// raised as [`ProviderError`]; there is no partial-success state.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openrouter").
    fn name(&self) -> &str;

    /// Send one request and return the decoded response document.
    async fn chat(&self, request: ChatRequest) -> Result<serde_json::Value, ProviderError>;
}
