//! The ReAct orchestrator: Reason → Act → Observe → Decide.
//!
//! Two entry points:
//!
//! - [`AgentOrchestrator::process`] answers a fresh query with a surface:
//!   one reasoning call, one generating call, one validation.
//! - [`AgentOrchestrator::process_action`] handles a form submission: route
//!   the action to its tool, observe the result, decide, and retry a bounded
//!   number of times before rendering a result or error surface.
//!
//! A surface the validator rejects is fatal for the turn. There is no
//! self-repair loop; the caller sees [`AgentError::InvalidModelOutput`].
//!
//! The context is never mutated in place. Both entry points return a new
//! [`AgentContext`] with one history entry appended.

use chrono::Utc;
use genui_core::{
    AgentContext, ChatRequest, DomainEvent, EventBus, LlmProvider, ProviderError, RetryRecord,
    ToolFailure, ToolResult, TurnKind, TurnRecord,
};
use genui_surface::{StructureValidator, SurfaceDescription};
use genui_tools::ToolRouter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::advisor::{AdjustmentAdvisor, LlmAdjustmentAdvisor};
use crate::decision::{Decision, Observation, decide_without_model};
use crate::error::AgentError;
use crate::prompts::{self, Phase};

/// Default number of attempts per action.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Orchestrator states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Idle,
    Reasoning,
    Acting,
    Observing,
    Deciding,
}

impl AgentState {
    /// Whether `self → to` is a legal transition.
    pub fn can_transition_to(self, to: AgentState) -> bool {
        use AgentState::*;
        matches!(
            (self, to),
            (Idle, Reasoning)
                | (Reasoning, Acting)
                | (Acting, Idle)
                | (Idle, Acting)
                | (Acting, Observing)
                | (Observing, Deciding)
                | (Deciding, Acting)
                | (Deciding, Idle)
        )
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Idle => "idle",
            AgentState::Reasoning => "reasoning",
            AgentState::Acting => "acting",
            AgentState::Observing => "observing",
            AgentState::Deciding => "deciding",
        };
        f.write_str(name)
    }
}

/// Per-turn state tracker. Every visited state is kept for the outcome.
#[derive(Debug)]
struct StateMachine {
    current: AgentState,
    trace: Vec<AgentState>,
}

impl StateMachine {
    fn new() -> Self {
        Self {
            current: AgentState::Idle,
            trace: vec![AgentState::Idle],
        }
    }

    fn transition(&mut self, to: AgentState) -> Result<(), AgentError> {
        if !self.current.can_transition_to(to) {
            return Err(AgentError::Internal(format!(
                "illegal state transition {} -> {to}",
                self.current
            )));
        }
        debug!(from = %self.current, to = %to, "State transition");
        self.current = to;
        self.trace.push(to);
        Ok(())
    }
}

/// What the reasoning phase concluded about a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reasoning {
    pub intent: String,
    #[serde(default)]
    pub required_info: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
}

impl Reasoning {
    /// Read the model's answer leniently; missing fields take defaults.
    pub fn from_value(value: &Value) -> Self {
        let intent = value
            .get("intent")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let required_info = value
            .get("requiredInfo")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let confidence = value
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        Self {
            intent,
            required_info,
            confidence,
        }
    }
}

/// The kind of surface a turn produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    Ui,
    Result,
    Error,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Ui => "ui",
            ResponseType::Result => "result",
            ResponseType::Error => "error",
        }
    }
}

/// Result of [`AgentOrchestrator::process`].
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    pub surface: SurfaceDescription,
    pub context: AgentContext,
    pub reasoning: Reasoning,
    pub trace: Vec<AgentState>,
}

/// Result of [`AgentOrchestrator::process_action`].
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub response_type: ResponseType,
    pub surface: SurfaceDescription,
    pub context: AgentContext,
    pub tool_result: Option<ToolResult>,
    /// The decision that ended the loop; `None` when attempts ran out.
    pub decision: Option<Decision>,
    pub attempts: u32,
    pub trace: Vec<AgentState>,
}

/// How the action loop ended.
enum LoopEnd {
    Complete(ToolResult),
    Failed {
        error: ToolFailure,
        /// Set when the advisor itself failed.
        cause: Option<ProviderError>,
    },
    Exhausted(Option<ToolFailure>),
}

/// Drives one turn at a time against a provider, a tool router and a
/// validator.
pub struct AgentOrchestrator {
    provider: Arc<dyn LlmProvider>,
    router: ToolRouter,
    validator: StructureValidator,
    advisor: Arc<dyn AdjustmentAdvisor>,
    max_retries: u32,
    event_bus: Arc<EventBus>,
}

impl AgentOrchestrator {
    /// Create an orchestrator whose adjustment advisor asks the same provider.
    pub fn new(provider: Arc<dyn LlmProvider>, router: ToolRouter) -> Self {
        let advisor = Arc::new(LlmAdjustmentAdvisor::new(provider.clone()));
        Self {
            provider,
            router,
            validator: StructureValidator::new(),
            advisor,
            max_retries: DEFAULT_MAX_RETRIES,
            event_bus: Arc::new(EventBus::default()),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn AdjustmentAdvisor>) -> Self {
        self.advisor = advisor;
        self
    }

    /// Attempts per action; values below 1 are raised to 1.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn with_validator(mut self, validator: StructureValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn router(&self) -> &ToolRouter {
        &self.router
    }

    /// Answer a fresh query with a validated surface.
    pub async fn process(
        &self,
        query: &str,
        context: &AgentContext,
    ) -> Result<QueryOutcome, AgentError> {
        let mut sm = StateMachine::new();
        let tools = self.router.registry().definitions();

        sm.transition(AgentState::Reasoning)?;
        let raw = self
            .call(Phase::Reasoning, prompts::reasoning(query, context, &tools))
            .await?;
        let reasoning = Reasoning::from_value(&raw);
        info!(intent = %reasoning.intent, confidence = reasoning.confidence, "Query analysed");

        sm.transition(AgentState::Acting)?;
        let surface = self
            .generate_surface(
                Phase::GeneratingUi,
                prompts::generate_ui(query, &raw, context, &tools),
            )
            .await?;

        sm.transition(AgentState::Idle)?;
        let mut next = context.with_turn(
            TurnRecord::new(TurnKind::Query {
                query: query.to_string(),
                intent: Some(reasoning.intent.clone()),
            })
            .with_surface(&surface.surface_id),
        );
        next.previous_ui = Some(genui_surface::to_value(&surface));

        Ok(QueryOutcome {
            surface,
            context: next,
            reasoning,
            trace: sm.trace,
        })
    }

    /// Handle a form submission through the bounded act/observe/decide loop.
    pub async fn process_action(
        &self,
        action_id: &str,
        form_data: Map<String, Value>,
        context: &AgentContext,
    ) -> Result<ActionOutcome, AgentError> {
        let mut sm = StateMachine::new();
        let mut ctx = context.clone();
        ctx.form_data = form_data.clone();
        ctx.retry_info.clear();

        let mut attempts = 0u32;
        let mut last_failure: Option<ToolFailure> = None;

        let end = loop {
            attempts += 1;

            sm.transition(AgentState::Acting)?;
            debug!(action_id, attempt = attempts, "Routing action");
            let result = self.router.route(action_id, form_data.clone()).await;
            self.event_bus.publish(DomainEvent::ToolExecuted {
                tool_name: result.metadata.tool_name.clone(),
                success: result.success,
                duration_ms: result.metadata.execution_time_ms,
                timestamp: Utc::now(),
            });

            sm.transition(AgentState::Observing)?;
            let observation = Observation::from_result(&result);
            last_failure = result.error.clone().or(last_failure);
            ctx.tool_result = Some(result.clone());

            sm.transition(AgentState::Deciding)?;
            let (decision, cause) = self.decide(action_id, &form_data, &observation, &ctx).await;
            info!(action_id, attempt = attempts, decision = decision.label(), "Decision made");
            self.event_bus.publish(DomainEvent::DecisionMade {
                action_id: action_id.to_string(),
                decision: decision.label().to_string(),
                attempt: attempts,
                timestamp: Utc::now(),
            });

            match decision {
                Decision::Complete => break LoopEnd::Complete(result),
                Decision::Error { error } => break LoopEnd::Failed { error, cause },
                Decision::Continue => {}
                Decision::Retry { adjustments } => {
                    ctx.retry_info.push(RetryRecord {
                        attempt_number: attempts,
                        observation: observation.to_value(),
                        adjustments,
                    });
                }
            }

            if attempts >= self.max_retries {
                warn!(action_id, attempts, "Action retries exhausted");
                break LoopEnd::Exhausted(last_failure.clone());
            }
        };

        let (response_type, surface, decision) = match end {
            LoopEnd::Complete(result) => {
                let surface = self
                    .generate_surface(
                        Phase::GeneratingResultUi,
                        prompts::generate_result_ui(action_id, &result, &ctx),
                    )
                    .await?;
                (ResponseType::Result, surface, Some(Decision::Complete))
            }
            LoopEnd::Failed { error, cause } => {
                let payload = failure_payload(&error);
                let surface = match self.error_surface(action_id, &payload, attempts, &ctx).await {
                    Ok(surface) => surface,
                    Err(err) => {
                        return Err(match cause {
                            Some(source) => AgentError::Provider {
                                phase: Phase::InferringAdjustments,
                                source,
                            },
                            None => err,
                        });
                    }
                };
                (ResponseType::Error, surface, Some(Decision::Error { error }))
            }
            LoopEnd::Exhausted(last) => {
                let payload = json!({
                    "code": "MAX_RETRIES",
                    "message": format!("Action '{action_id}' failed after {attempts} attempts"),
                    "details": {
                        "attempts": attempts,
                        "lastError": last.as_ref().map(failure_payload),
                    },
                });
                let surface = self.error_surface(action_id, &payload, attempts, &ctx).await?;
                (ResponseType::Error, surface, None)
            }
        };

        sm.transition(AgentState::Idle)?;
        let tool_result = ctx.tool_result.clone();
        let mut next = ctx.with_turn(
            TurnRecord::new(TurnKind::Action {
                action_id: action_id.to_string(),
            })
            .with_surface(&surface.surface_id)
            .with_outcome(response_type.as_str(), attempts),
        );
        next.previous_ui = Some(genui_surface::to_value(&surface));

        Ok(ActionOutcome {
            response_type,
            surface,
            context: next,
            tool_result,
            decision,
            attempts,
            trace: sm.trace,
        })
    }

    /// Decide on one observation. A failing advisor turns into an `Error`
    /// decision carrying the provider's code; the provider error comes back
    /// alongside so it can propagate if no error surface can be produced.
    async fn decide(
        &self,
        action_id: &str,
        form_data: &Map<String, Value>,
        observation: &Observation,
        context: &AgentContext,
    ) -> (Decision, Option<ProviderError>) {
        if let Some(decision) = decide_without_model(observation) {
            return (decision, None);
        }
        match self
            .advisor
            .infer_adjustments(action_id, form_data, observation, context)
            .await
        {
            Ok(adjustments) => (Decision::Retry { adjustments }, None),
            Err(e) => {
                warn!(action_id, code = e.code(), "Adjustment inference failed");
                let error = ToolFailure::new(e.code(), e.to_string(), e.details());
                (Decision::Error { error }, Some(e))
            }
        }
    }

    async fn error_surface(
        &self,
        action_id: &str,
        error: &Value,
        attempts: u32,
        context: &AgentContext,
    ) -> Result<SurfaceDescription, AgentError> {
        self.generate_surface(
            Phase::GeneratingErrorUi,
            prompts::generate_error_ui(action_id, error, attempts, context),
        )
        .await
    }

    async fn call(&self, phase: Phase, request: ChatRequest) -> Result<Value, AgentError> {
        debug!(phase = %phase, "Calling provider");
        self.provider.chat(request).await.map_err(|source| {
            warn!(phase = %phase, code = source.code(), "Provider call failed");
            AgentError::Provider { phase, source }
        })
    }

    /// One provider call whose answer must be a valid surface.
    async fn generate_surface(
        &self,
        phase: Phase,
        request: ChatRequest,
    ) -> Result<SurfaceDescription, AgentError> {
        let raw = self.call(phase, request).await?;
        match self.validator.validate_value(&raw) {
            Ok(surface) => {
                info!(phase = %phase, surface_id = %surface.surface_id, components = surface.len(), "Surface generated");
                self.event_bus.publish(DomainEvent::SurfaceGenerated {
                    surface_id: surface.surface_id.clone(),
                    phase: phase.as_str().to_string(),
                    component_count: surface.len(),
                    timestamp: Utc::now(),
                });
                Ok(surface)
            }
            Err(source) => {
                warn!(phase = %phase, code = source.code(), error = %source, "Model output rejected");
                self.event_bus.publish(DomainEvent::ValidationFailed {
                    phase: phase.as_str().to_string(),
                    code: source.code().to_string(),
                    timestamp: Utc::now(),
                });
                Err(AgentError::InvalidModelOutput { phase, source })
            }
        }
    }
}

fn failure_payload(failure: &ToolFailure) -> Value {
    json!({
        "code": failure.code,
        "message": failure.message,
        "details": failure.details,
    })
}
