//! # genui core
//!
//! Domain types, traits, and error definitions shared by every genui crate.
//! The language-model transport, the tool layer and the orchestrator all
//! depend inward on this crate.
//!
//! ## Design Philosophy
//!
//! Every collaborator the orchestrator talks to is a trait defined here:
//! - [`LlmProvider`] for the model transport
//! - [`Tool`] for individual action handlers
//!
//! Implementations live in their own crates, so tests can swap in scripted
//! stubs without touching the network.

pub mod context;
pub mod error;
pub mod event;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use context::{AgentContext, RetryRecord, TurnKind, TurnRecord};
pub use error::{ProviderError, ToolError};
pub use event::{DomainEvent, EventBus};
pub use provider::{ChatRequest, LlmProvider, ResponseFormat};
pub use tool::{
    ParamSpec, ParamType, Tool, ToolFailure, ToolMetadata, ToolRegistry, ToolResult,
    is_valid_action_id,
};
