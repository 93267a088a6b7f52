//! `genui tools`: List the tools an action can route to.

use genui_core::Tool;
use genui_tools::{InstanceStore, default_registry};
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = default_registry(Arc::new(InstanceStore::new()))?;

    println!("🔧 {} tool(s) registered\n", registry.len());
    for name in registry.names() {
        let Some(tool) = registry.get(name) else {
            continue;
        };
        println!("  {name:<20} {}", tool.description());
        for param in tool.parameters() {
            let marker = if param.required { "*" } else { " " };
            let ty = serde_json::to_value(param.param_type)?;
            println!(
                "    {marker} {}: {}  {}",
                param.name,
                ty.as_str().unwrap_or("any"),
                param.description
            );
        }
    }
    println!("\n  * required");
    Ok(())
}
