//! Render plan: which components draw at top level, and which are drawn
//! only inside their parent Button.

use std::collections::HashSet;

use crate::model::SurfaceDescription;

/// One top-level component, with the child it renders inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEntry {
    pub id: String,
    pub child: Option<String>,
}

/// Ordered top-level entries of a surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPlan {
    pub entries: Vec<RenderEntry>,
}

impl RenderPlan {
    /// Components referenced as a `child` are not drawn at top level. A child
    /// shared by several Buttons is drawn under the first one in component
    /// order; later referrers render without it. Nesting is one level deep.
    pub fn compute(surface: &SurfaceDescription) -> Self {
        let referenced: HashSet<&str> = surface
            .components
            .iter()
            .filter_map(|c| c.child())
            .collect();

        let mut claimed: HashSet<&str> = HashSet::new();
        let entries = surface
            .components
            .iter()
            .filter(|c| !referenced.contains(c.id.as_str()))
            .map(|c| {
                let child = c
                    .child()
                    .filter(|child| claimed.insert(*child))
                    .map(String::from);
                RenderEntry {
                    id: c.id.clone(),
                    child,
                }
            })
            .collect();

        Self { entries }
    }

    pub fn top_level_ids(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructureValidator;
    use serde_json::json;

    fn surface(components: serde_json::Value) -> SurfaceDescription {
        let doc = json!({"surfaceUpdate": {"surfaceId": "s", "components": components}});
        StructureValidator::new().validate_value(&doc).unwrap()
    }

    #[test]
    fn child_is_nested_under_forward_referrer() {
        let s = surface(json!([
            {"id": "title", "component": {"Text": {"text": "Hi"}}},
            {"id": "go", "component": {"Button": {"action": {"name": "go"}, "child": "go_label"}}},
            {"id": "go_label", "component": {"Text": {"text": "Go"}}}
        ]));
        let plan = RenderPlan::compute(&s);
        assert_eq!(plan.top_level_ids(), vec!["title", "go"]);
        assert_eq!(plan.entries[1].child.as_deref(), Some("go_label"));
        assert_eq!(plan.entries[0].child, None);
    }

    #[test]
    fn shared_child_renders_once() {
        let s = surface(json!([
            {"id": "a", "component": {"Button": {"action": {"name": "a"}, "child": "label"}}},
            {"id": "b", "component": {"Button": {"action": {"name": "b"}, "child": "label"}}},
            {"id": "label", "component": {"Text": {"text": "Shared"}}}
        ]));
        let plan = RenderPlan::compute(&s);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.entries[0].child.as_deref(), Some("label"));
        assert_eq!(plan.entries[1].child, None);
    }

    #[test]
    fn self_reference_drops_from_top_level() {
        let s = surface(json!([
            {"id": "loop", "component": {"Button": {"action": {"name": "x"}, "child": "loop"}}},
            {"id": "t", "component": {"Text": {"text": "t"}}}
        ]));
        assert_eq!(RenderPlan::compute(&s).top_level_ids(), vec!["t"]);
    }

    #[test]
    fn empty_surface_has_empty_plan() {
        let s = surface(json!([]));
        assert!(RenderPlan::compute(&s).is_empty());
    }
}
