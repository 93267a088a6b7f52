//! `genui act`: Run an action through the retry loop.

use genui_config::AppConfig;
use std::path::PathBuf;

pub async fn run(
    action_id: String,
    data: String,
    context: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let form_data: serde_json::Value = serde_json::from_str(&data)
        .map_err(|e| format!("--data is not valid JSON: {e}"))?;
    let config = AppConfig::load()?;
    let orchestrator = super::build_orchestrator(&config)?;
    let context = super::read_context(context.as_deref())?;

    tracing::info!(action_id = %action_id, max_retries = orchestrator.max_retries(), "Submitting action");
    let result = genui_agent::submit_action(&orchestrator, &action_id, form_data, context).await;
    super::print_response(result)?;
    Ok(())
}
