//! Provider construction from configuration.

use genui_config::AppConfig;
use genui_core::LlmProvider;
use std::sync::Arc;
use tracing::debug;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured default provider.
///
/// A missing API key is not an error here; the provider reports
/// `MISSING_API_KEY` on its first call, so commands that never reach the
/// model (validate, tools) still work without one.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn LlmProvider> {
    let name = config.default_provider.as_str();
    let provider_config = config.providers.get(name);

    let model = provider_config
        .and_then(|p| p.default_model.clone())
        .unwrap_or_else(|| config.default_model.clone());
    let base_url = provider_config
        .and_then(|p| p.api_url.clone())
        .unwrap_or_else(|| default_base_url(name));

    let provider = if name == "ollama" {
        OpenAiCompatProvider::ollama(Some(base_url.as_str()), &model)
    } else {
        let api_key = config.api_key_for(name).unwrap_or_default();
        OpenAiCompatProvider::new(name, &base_url, api_key, &model)
    };

    debug!(provider = name, model = %model, base_url = %base_url, "Built provider");

    Arc::new(
        provider
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_rate_limit(config.rate_limit.clone()),
    )
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
