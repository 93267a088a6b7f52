//! The generative-UI agent: the heart of genui.
//!
//! The agent follows a **Reason → Act → Observe → Decide** cycle:
//!
//! 1. **Reason** about a fresh query (what does the user want?)
//! 2. **Act** by generating a surface, or by routing a submitted action to its tool
//! 3. **Observe** the tool result
//! 4. **Decide**: complete, retry with model-suggested adjustments, or fail
//!
//! Every surface the model produces passes the structure validator before it
//! leaves this crate. Action loops are bounded by `max_retries`.

pub mod advisor;
pub mod decision;
pub mod error;
pub mod operations;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use advisor::{AdjustmentAdvisor, LlmAdjustmentAdvisor};
pub use decision::{Decision, NON_RETRYABLE_CODES, Observation, is_retryable};
pub use error::AgentError;
pub use operations::{
    ErrorCategory, OperationError, OperationResponse, submit_action, submit_query,
};
pub use orchestrator::{
    ActionOutcome, AgentOrchestrator, AgentState, DEFAULT_MAX_RETRIES, QueryOutcome, Reasoning,
    ResponseType,
};
pub use prompts::Phase;
