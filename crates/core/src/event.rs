//! Domain event system: decoupled observation of agent turns.
//!
//! The orchestrator publishes an event at each interesting step of a turn.
//! Observers (CLI progress output, tests, metrics adapters) subscribe
//! without the orchestrator knowing about them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A surface passed validation and is about to be returned.
    SurfaceGenerated {
        surface_id: String,
        phase: String,
        component_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Model output was rejected by the structure validator.
    ValidationFailed {
        phase: String,
        code: String,
        timestamp: DateTime<Utc>,
    },

    /// A tool was routed and executed (or rejected before execution).
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The decide step picked an outcome.
    DecisionMade {
        action_id: String,
        decision: String,
        attempt: u32,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
