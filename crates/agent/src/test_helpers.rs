//! Shared test helpers for orchestrator tests.

use async_trait::async_trait;
use genui_core::{
    AgentContext, ChatRequest, LlmProvider, ParamSpec, ParamType, ProviderError, Tool, ToolError,
};
use serde_json::{Map, Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::advisor::AdjustmentAdvisor;
use crate::decision::Observation;

/// A provider that replays scripted results and records every request.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    results: Mutex<VecDeque<Result<Value, ProviderError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Value>) -> Self {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<Value, ProviderError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<Value, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let call = requests.len();
        drop(requests);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedProvider: no more responses (call #{call})"))
    }
}

/// An advisor that counts calls and returns fixed adjustments or an error.
pub struct StubAdvisor {
    response: Result<Map<String, Value>, ProviderError>,
    calls: Mutex<usize>,
}

impl StubAdvisor {
    pub fn returning(adjustments: Value) -> Self {
        Self {
            response: Ok(adjustments.as_object().cloned().unwrap_or_default()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            response: Err(error),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl AdjustmentAdvisor for StubAdvisor {
    async fn infer_adjustments(
        &self,
        _action_id: &str,
        _form_data: &Map<String, Value>,
        _observation: &Observation,
        _context: &AgentContext,
    ) -> Result<Map<String, Value>, ProviderError> {
        *self.calls.lock().unwrap() += 1;
        self.response.clone()
    }
}

/// A tool that fails every call with one code, counting executions.
pub struct FailingTool {
    pub name: &'static str,
    pub code: &'static str,
    pub calls: Mutex<usize>,
}

impl FailingTool {
    pub fn new(name: &'static str, code: &'static str) -> Self {
        Self {
            name,
            code,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        self.name
    }
    fn description(&self) -> &str {
        "Always fails"
    }
    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::optional("target", ParamType::String)]
    }
    async fn execute(&self, _params: Map<String, Value>) -> Result<Value, ToolError> {
        *self.calls.lock().unwrap() += 1;
        Err(ToolError::failed(self.code, format!("{} failed", self.name)))
    }
}

/// A minimal valid surface document.
pub fn surface_json(surface_id: &str, text: &str) -> Value {
    json!({
        "surfaceUpdate": {
            "surfaceId": surface_id,
            "components": [
                {"id": "msg", "component": {"Text": {"text": {"literalString": text}}}}
            ]
        }
    })
}

/// A surface with a single Alert of the given type.
pub fn alert_json(surface_id: &str, alert_type: &str, message: &str) -> Value {
    json!({
        "surfaceUpdate": {
            "surfaceId": surface_id,
            "components": [
                {"id": "alert", "component": {"Alert": {"type": alert_type, "message": message}}}
            ]
        }
    })
}
