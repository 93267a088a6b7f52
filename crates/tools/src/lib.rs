//! Action routing and the built-in demo tools.
//!
//! [`ToolRouter`] sits between a submitted form and a [`genui_core::Tool`]:
//! it checks the action id, coerces form strings into declared parameter
//! types, enforces required parameters, and turns every outcome (handler
//! panics included) into a [`genui_core::ToolResult`].
//!
//! The [`instances`] module provides an in-memory compute-instance tool set
//! so the whole pipeline can run without external services.

pub mod coerce;
pub mod instances;
pub mod router;

use genui_core::{ToolError, ToolRegistry};
use std::sync::Arc;

pub use coerce::{coerce_params, coerce_value, missing_required};
pub use instances::{
    CreateInstanceTool, Instance, InstanceStore, ListInstancesTool, TerminateInstanceTool,
};
pub use router::ToolRouter;

/// Create a registry with the built-in instance tools sharing one store.
pub fn default_registry(store: Arc<InstanceStore>) -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateInstanceTool::new(store.clone())))?;
    registry.register(Arc::new(ListInstancesTool::new(store.clone())))?;
    registry.register(Arc::new(TerminateInstanceTool::new(store)))?;
    Ok(registry)
}
