//! `genui validate`: Run the structure validator over a file.

use genui_config::AppConfig;
use genui_surface::{RenderPlan, StructureValidator};
use std::path::PathBuf;

pub async fn run(file: PathBuf, max_depth: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&file)?;
    let max_depth = match max_depth {
        Some(depth) => depth,
        None => AppConfig::load()?.validator.max_depth,
    };
    let validator = StructureValidator::new().with_max_depth(max_depth);

    match validator.parse(&raw) {
        Ok(surface) => {
            println!("{}", genui_surface::print(&surface));
            let plan = RenderPlan::compute(&surface);
            eprintln!(
                "✅ {} valid: {} component(s), render order: {}",
                surface.surface_id,
                surface.len(),
                plan.top_level_ids().join(", ")
            );
            let actions = surface.actions();
            if !actions.is_empty() {
                eprintln!("   actions: {}", actions.join(", "));
            }
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.to_payload())?);
            std::process::exit(1);
        }
    }
    Ok(())
}
