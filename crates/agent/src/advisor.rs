//! The adjustment advisor: how a retryable failure should be retried.
//!
//! Kept behind a trait so the retry policy can be driven by a deterministic
//! stub in tests.

use async_trait::async_trait;
use genui_core::{AgentContext, LlmProvider, ProviderError};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::decision::Observation;
use crate::prompts;

#[async_trait]
pub trait AdjustmentAdvisor: Send + Sync {
    /// Propose parameter adjustments for the next attempt.
    async fn infer_adjustments(
        &self,
        action_id: &str,
        form_data: &Map<String, Value>,
        observation: &Observation,
        context: &AgentContext,
    ) -> Result<Map<String, Value>, ProviderError>;
}

/// Asks the language model for adjustments.
pub struct LlmAdjustmentAdvisor {
    provider: Arc<dyn LlmProvider>,
}

impl LlmAdjustmentAdvisor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl AdjustmentAdvisor for LlmAdjustmentAdvisor {
    async fn infer_adjustments(
        &self,
        action_id: &str,
        form_data: &Map<String, Value>,
        observation: &Observation,
        context: &AgentContext,
    ) -> Result<Map<String, Value>, ProviderError> {
        let request = prompts::infer_adjustments(action_id, form_data, observation, context);
        let response = self.provider.chat(request).await?;
        let adjustments = extract_adjustments(response);
        debug!(action_id, keys = adjustments.len(), "Adjustments inferred");
        Ok(adjustments)
    }
}

/// Accept `{"adjustments": {..}}` or a bare object; anything else is no change.
fn extract_adjustments(response: Value) -> Map<String, Value> {
    match response {
        Value::Object(mut obj) => match obj.remove("adjustments") {
            Some(Value::Object(inner)) => inner,
            Some(other) => {
                obj.insert("adjustments".into(), other);
                obj
            }
            None => obj,
        },
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use genui_core::{ToolFailure, ToolResult};
    use serde_json::json;

    fn observation() -> Observation {
        Observation::from_result(&ToolResult::fail(
            "create_instance",
            ToolFailure::new("TIMEOUT", "timed out", json!({})),
            5,
        ))
    }

    #[test]
    fn adjustment_shapes() {
        assert_eq!(
            extract_adjustments(json!({"adjustments": {"region": "us-west-2"}})),
            json!({"region": "us-west-2"}).as_object().cloned().unwrap()
        );
        assert_eq!(
            extract_adjustments(json!({"count": 1})),
            json!({"count": 1}).as_object().cloned().unwrap()
        );
        assert!(extract_adjustments(json!("retry later")).is_empty());
    }

    #[tokio::test]
    async fn llm_advisor_uses_adjustment_phase_prompt() {
        let provider = Arc::new(ScriptedProvider::new(vec![json!({
            "adjustments": {"instanceType": "t3.micro"}
        })]));
        let advisor = LlmAdjustmentAdvisor::new(provider.clone());
        let adjustments = advisor
            .infer_adjustments("create_instance", &Map::new(), &observation(), &AgentContext::new())
            .await
            .unwrap();
        assert_eq!(adjustments["instanceType"], "t3.micro");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.requests()[0].user_prompt.contains("timed out"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::with_results(vec![Err(
            ProviderError::EmptyResponse,
        )]));
        let err = LlmAdjustmentAdvisor::new(provider)
            .infer_adjustments("create_instance", &Map::new(), &observation(), &AgentContext::new())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EMPTY_RESPONSE");
    }
}
