//! Demo compute-instance tools backed by an in-memory store.
//!
//! Enough behavior to drive forms end-to-end: a create form with typed
//! optional fields, a list view for a Table, and a terminate action that can
//! fail with `NOT_FOUND`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use genui_core::{ParamSpec, ParamType, Tool, ToolError};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Instance types the demo store accepts.
pub const INSTANCE_TYPES: &[&str] = &[
    "t2.micro",
    "t2.small",
    "t2.medium",
    "t3.micro",
    "t3.small",
    "t3.medium",
    "m5.large",
    "m5.xlarge",
    "c5.large",
    "r5.large",
];

const MAX_COUNT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub instance_id: String,
    pub instance_name: String,
    pub instance_type: String,
    pub region: String,
    pub state: String,
    pub monitoring: bool,
    pub tags: Map<String, Value>,
    pub security_groups: Vec<String>,
    pub launched_at: DateTime<Utc>,
}

/// Shared instance state, in launch order.
#[derive(Debug, Default)]
pub struct InstanceStore {
    instances: RwLock<Vec<Instance>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, instance: Instance) {
        self.instances.write().await.push(instance);
    }

    pub async fn list(&self, region: Option<&str>) -> Vec<Instance> {
        self.instances
            .read()
            .await
            .iter()
            .filter(|i| region.is_none_or(|r| i.region == r))
            .cloned()
            .collect()
    }

    /// Mark an instance terminated, returning its new state.
    pub async fn terminate(&self, instance_id: &str) -> Option<Instance> {
        let mut instances = self.instances.write().await;
        let instance = instances.iter_mut().find(|i| i.instance_id == instance_id)?;
        instance.state = "terminated".into();
        Some(instance.clone())
    }

    pub async fn len(&self) -> usize {
        self.instances.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.instances.read().await.is_empty()
    }
}

fn new_instance_id() -> String {
    let hex = uuid::Uuid::new_v4().simple().to_string();
    format!("i-{}", &hex[..17])
}

fn string_param<'a>(params: &'a Map<String, Value>, name: &str) -> Result<&'a str, ToolError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(name, format!("'{name}' must be a string")))
}

fn invalid(name: &str, message: String) -> ToolError {
    ToolError::Failed {
        code: "INVALID_PARAMETER".into(),
        message,
        details: json!({ "parameter": name }),
    }
}

pub struct CreateInstanceTool {
    store: Arc<InstanceStore>,
}

impl CreateInstanceTool {
    pub fn new(store: Arc<InstanceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CreateInstanceTool {
    fn name(&self) -> &str {
        "create_instance"
    }

    fn description(&self) -> &str {
        "Launch one or more compute instances"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("instanceName", ParamType::String).describe("Display name"),
            ParamSpec::required("instanceType", ParamType::String)
                .describe("Instance size, e.g. t2.micro"),
            ParamSpec::required("region", ParamType::String).describe("Region, e.g. us-east-1"),
            ParamSpec::optional("count", ParamType::Number).describe("How many to launch (1-10)"),
            ParamSpec::optional("monitoring", ParamType::Boolean),
            ParamSpec::optional("tags", ParamType::Object).describe("key=value,key=value"),
            ParamSpec::optional("securityGroups", ParamType::Array),
        ]
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let name = string_param(&params, "instanceName")?;
        let instance_type = string_param(&params, "instanceType")?;
        let region = string_param(&params, "region")?;

        if !INSTANCE_TYPES.contains(&instance_type) {
            return Err(ToolError::Failed {
                code: "INVALID_PARAMETER".into(),
                message: format!("Unknown instance type '{instance_type}'"),
                details: json!({ "parameter": "instanceType", "allowed": INSTANCE_TYPES }),
            });
        }

        let count = match params.get("count") {
            None => 1,
            Some(v) => v
                .as_i64()
                .filter(|n| (1..=MAX_COUNT).contains(n))
                .ok_or_else(|| invalid("count", format!("count must be 1-{MAX_COUNT}")))?,
        };
        let monitoring = params
            .get("monitoring")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let tags = params
            .get("tags")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let security_groups: Vec<String> = params
            .get("securityGroups")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let mut launched = Vec::new();
        for n in 0..count {
            let instance_name = if count == 1 {
                name.to_string()
            } else {
                format!("{name}-{}", n + 1)
            };
            let instance = Instance {
                instance_id: new_instance_id(),
                instance_name,
                instance_type: instance_type.to_string(),
                region: region.to_string(),
                state: "running".into(),
                monitoring,
                tags: tags.clone(),
                security_groups: security_groups.clone(),
                launched_at: Utc::now(),
            };
            self.store.insert(instance.clone()).await;
            launched.push(instance);
        }

        info!(count, instance_type, region, "Launched instances");
        Ok(json!({ "instances": launched, "count": launched.len() }))
    }
}

pub struct ListInstancesTool {
    store: Arc<InstanceStore>,
}

impl ListInstancesTool {
    pub fn new(store: Arc<InstanceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ListInstancesTool {
    fn name(&self) -> &str {
        "list_instances"
    }

    fn description(&self) -> &str {
        "List instances, optionally filtered by region"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::optional("region", ParamType::String)]
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let region = params.get("region").and_then(Value::as_str);
        let instances = self.store.list(region).await;
        Ok(json!({ "instances": instances, "count": instances.len() }))
    }
}

pub struct TerminateInstanceTool {
    store: Arc<InstanceStore>,
}

impl TerminateInstanceTool {
    pub fn new(store: Arc<InstanceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for TerminateInstanceTool {
    fn name(&self) -> &str {
        "terminate_instance"
    }

    fn description(&self) -> &str {
        "Terminate an instance by id"
    }

    fn parameters(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required("instanceId", ParamType::String)]
    }

    async fn execute(&self, params: Map<String, Value>) -> Result<Value, ToolError> {
        let instance_id = string_param(&params, "instanceId")?;
        match self.store.terminate(instance_id).await {
            Some(instance) => {
                info!(instance_id, "Terminated instance");
                Ok(json!({ "instance": instance }))
            }
            None => Err(ToolError::Failed {
                code: "NOT_FOUND".into(),
                message: format!("Instance '{instance_id}' does not exist"),
                details: json!({ "instanceId": instance_id }),
            }),
        }
    }
}
