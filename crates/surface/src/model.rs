//! Validated surface types.
//!
//! These types only come out of [`crate::StructureValidator`]; there is no
//! `Deserialize` impl, so untrusted JSON cannot skip the validation passes.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::whitelist::ComponentKind;

/// One component of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub id: String,
    pub kind: ComponentKind,
    pub properties: Map<String, Value>,
}

impl ComponentNode {
    pub fn new(id: impl Into<String>, kind: ComponentKind, properties: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            kind,
            properties,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Reference-bearing properties that are set (non-null), with their raw values.
    pub fn references(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.kind
            .reference_fields()
            .iter()
            .filter_map(|field| match self.properties.get(*field) {
                None | Some(Value::Null) => None,
                Some(value) => Some((*field, value)),
            })
    }

    /// The id this component renders as its child, if any.
    pub fn child(&self) -> Option<&str> {
        if !self.kind.reference_fields().contains(&"child") {
            return None;
        }
        self.properties.get("child").and_then(Value::as_str)
    }

    /// `action.name` of a Button.
    pub fn action_name(&self) -> Option<&str> {
        if self.kind != ComponentKind::Button {
            return None;
        }
        self.properties
            .get("action")
            .and_then(|a| a.get("name"))
            .and_then(Value::as_str)
    }
}

/// One complete, replaceable UI description.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceDescription {
    pub surface_id: String,
    pub components: Vec<ComponentNode>,
}

impl SurfaceDescription {
    pub fn get(&self, id: &str) -> Option<&ComponentNode> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Action ids of every Button, in component order.
    pub fn actions(&self) -> Vec<&str> {
        self.components
            .iter()
            .filter_map(ComponentNode::action_name)
            .collect()
    }
}

impl Serialize for SurfaceDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::serializer::to_value(self).serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn button_exposes_child_and_action() {
        let button = ComponentNode::new(
            "submit",
            ComponentKind::Button,
            props(json!({"action": {"name": "create_instance"}, "child": "label"})),
        );
        assert_eq!(button.child(), Some("label"));
        assert_eq!(button.action_name(), Some("create_instance"));
        assert_eq!(button.references().count(), 1);
    }

    #[test]
    fn non_button_child_is_not_a_reference() {
        let text = ComponentNode::new(
            "t",
            ComponentKind::Text,
            props(json!({"text": {"literalString": "hi"}, "child": "other"})),
        );
        assert_eq!(text.child(), None);
        assert_eq!(text.references().count(), 0);
        assert_eq!(text.action_name(), None);
    }

    #[test]
    fn null_reference_is_ignored() {
        let button = ComponentNode::new(
            "b",
            ComponentKind::Button,
            props(json!({"action": {"name": "go"}, "child": null})),
        );
        assert_eq!(button.references().count(), 0);
    }
}
