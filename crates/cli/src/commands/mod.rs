pub mod act;
pub mod ask;
pub mod doctor;
pub mod onboard;
pub mod tools;
pub mod validate;

use anyhow::Context;
use genui_agent::{AgentOrchestrator, OperationError, OperationResponse};
use genui_config::AppConfig;
use genui_surface::StructureValidator;
use genui_tools::{InstanceStore, ToolRouter, default_registry};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Wire the configured provider, the built-in tools and the validator together.
pub(crate) fn build_orchestrator(config: &AppConfig) -> anyhow::Result<AgentOrchestrator> {
    let provider = genui_providers::build_from_config(config);
    let registry = default_registry(Arc::new(InstanceStore::new()))
        .context("failed to register built-in tools")?;
    let validator = StructureValidator::new().with_max_depth(config.validator.max_depth);
    Ok(
        AgentOrchestrator::new(provider, ToolRouter::new(Arc::new(registry)))
            .with_max_retries(config.agent.max_retries)
            .with_validator(validator),
    )
}

/// Read a saved agent context; no file means a fresh context.
pub(crate) fn read_context(path: Option<&Path>) -> anyhow::Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Null);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read context file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("context file {} is not valid JSON", path.display()))
}

/// Print an operation envelope, or its error payload and exit non-zero.
pub(crate) fn print_response(
    result: Result<OperationResponse, OperationError>,
) -> anyhow::Result<()> {
    match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_payload())?);
            std::process::exit(if e.status_code() == 400 { 2 } else { 1 });
        }
    }
}
