//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, Together AI, and any
//! endpoint exposing `/chat/completions`.
//!
//! Supports:
//! - JSON mode (`response_format: json_object`) with code-fence tolerant decoding
//! - HTTP 429 backoff honouring `Retry-After`, bounded by [`RateLimitConfig`]

use async_trait::async_trait;
use genui_config::RateLimitConfig;
use genui_core::{ChatRequest, LlmProvider, ProviderError, ResponseFormat};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Longest raw-content snippet attached to a JSON parse failure.
const RAW_SNIPPET_CHARS: usize = 200;

/// Wait used when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    requires_key: bool,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    rate_limit: RateLimitConfig,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            requires_key: true,
            model: model.into(),
            temperature: 0.2,
            max_tokens: None,
            rate_limit: RateLimitConfig::default(),
            client,
        }
    }

    /// Create an OpenRouter provider (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key, model)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key, model)
    }

    /// Create an Ollama provider (convenience constructor). No key needed.
    pub fn ollama(base_url: Option<&str>, model: impl Into<String>) -> Self {
        let mut provider = Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "",
            model,
        );
        provider.requires_key = false;
        provider
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.user_prompt },
            ],
            "temperature": request.temperature.unwrap_or(self.temperature),
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens.or(self.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }

        if request.response_format == ResponseFormat::Json {
            body["response_format"] = json!({ "type": "json_object" });
        }

        body
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, request: ChatRequest) -> Result<Value, ProviderError> {
        if self.requires_key && self.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey {
                provider: self.name.clone(),
            });
        }

        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(&request);
        let mut rate_limited = 0u32;

        loop {
            debug!(provider = %self.name, model = %self.model, "Sending chat request");

            let mut call = self.client.post(&url).json(&body);
            if !self.api_key.is_empty() {
                call = call.bearer_auth(&self.api_key);
            }
            let response = call.send().await.map_err(|e| ProviderError::Connection {
                status: None,
                message: e.to_string(),
            })?;

            let status = response.status();

            if status.as_u16() == 429 {
                let wait = retry_after_secs(response.headers())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
                    .min(self.rate_limit.max_backoff_secs);
                if rate_limited >= self.rate_limit.max_retries {
                    warn!(provider = %self.name, attempts = rate_limited + 1, "Rate limit retries exhausted");
                    return Err(ProviderError::RateLimited {
                        retry_after_secs: wait,
                    });
                }
                rate_limited += 1;
                warn!(provider = %self.name, wait_secs = wait, attempt = rate_limited, "Rate limited, backing off");
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), body = %error_body, "Provider returned error");
                return Err(ProviderError::Connection {
                    status: Some(status.as_u16()),
                    message: error_body,
                });
            }

            let api_response: ApiResponse =
                response.json().await.map_err(|e| ProviderError::Connection {
                    status: Some(status.as_u16()),
                    message: format!("Failed to parse response: {e}"),
                })?;

            let content = api_response
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default();

            return decode_content(&content, request.response_format);
        }
    }
}

/// Seconds from a numeric `Retry-After` header.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Turn the assistant message text into the caller's requested shape.
fn decode_content(content: &str, format: ResponseFormat) -> Result<Value, ProviderError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    match format {
        ResponseFormat::Text => Ok(Value::String(trimmed.to_string())),
        ResponseFormat::Json => {
            let unfenced = strip_code_fence(trimmed);
            serde_json::from_str(unfenced).map_err(|e| ProviderError::JsonParse {
                message: e.to_string(),
                raw: unfenced.chars().take(RAW_SNIPPET_CHARS).collect(),
            })
        }
    }
}

/// Remove a surrounding Markdown code fence (```` ```json ... ``` ````).
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

// --- OpenAI API types ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}
