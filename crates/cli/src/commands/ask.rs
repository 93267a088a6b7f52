//! `genui ask`: Generate a surface for a query.

use genui_config::AppConfig;
use std::path::PathBuf;

pub async fn run(message: String, context: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let orchestrator = super::build_orchestrator(&config)?;
    let context = super::read_context(context.as_deref())?;

    tracing::info!(provider = %config.default_provider, model = %config.default_model, "Submitting query");
    let result = genui_agent::submit_query(&orchestrator, &message, context).await;
    super::print_response(result)?;
    Ok(())
}
