//! Structure validator: parse, shape-check, scan, collect, resolve.
//!
//! Fail-fast: each pass runs only if every earlier pass succeeded, and the
//! first violation is the one reported. Reference resolution is a separate
//! pass over the complete id set, which is what makes forward references
//! (a Button whose child appears later in the list) legal.

use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::error::ValidationError;
use crate::model::{ComponentNode, SurfaceDescription};
use crate::security;
use crate::whitelist::{ComponentKind, ComponentWhitelist};

/// Default recursion bound for the security scan.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Converts untrusted model output into a [`SurfaceDescription`].
#[derive(Debug, Clone)]
pub struct StructureValidator {
    max_depth: usize,
}

impl StructureValidator {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Bound the nesting depth the security scan will walk.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode `raw` and validate it.
    pub fn parse(&self, raw: &str) -> Result<SurfaceDescription, ValidationError> {
        let doc: Value = serde_json::from_str(raw).map_err(|e| ValidationError::JsonSyntax {
            message: e.to_string(),
            line: e.line(),
            column: e.column(),
            position: char_position(raw, e.line(), e.column()),
        })?;
        self.validate_value(&doc)
    }

    /// Validate an already-decoded document.
    pub fn validate_value(&self, doc: &Value) -> Result<SurfaceDescription, ValidationError> {
        let (surface_id, entries) = check_shape(doc)?;
        security::scan(doc, self.max_depth)?;
        let (components, ids) = collect_components(entries)?;
        resolve_references(&components, &ids)?;

        debug!(
            surface_id,
            components = components.len(),
            "Surface validated"
        );
        Ok(SurfaceDescription {
            surface_id: surface_id.to_string(),
            components,
        })
    }
}

impl Default for StructureValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Character offset of a 1-based line / byte-column pair.
fn char_position(raw: &str, line: usize, column: usize) -> usize {
    let line_start: usize = raw
        .split('\n')
        .take(line.saturating_sub(1))
        .map(|l| l.len() + 1)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(raw.len());
    while !raw.is_char_boundary(offset) {
        offset -= 1;
    }
    raw[..offset].chars().count()
}

fn check_shape(doc: &Value) -> Result<(&str, &Vec<Value>), ValidationError> {
    let root = doc
        .as_object()
        .ok_or_else(|| ValidationError::schema("$", "top level must be an object"))?;
    let update = match root.get("surfaceUpdate") {
        None => return Err(ValidationError::missing("$", "surfaceUpdate")),
        Some(Value::Object(update)) => update,
        Some(_) => {
            return Err(ValidationError::schema(
                "$.surfaceUpdate",
                "surfaceUpdate must be an object",
            ));
        }
    };
    let surface_id = update
        .get("surfaceId")
        .and_then(Value::as_str)
        .ok_or_else(|| ValidationError::missing("$.surfaceUpdate", "surfaceId"))?;
    let entries = update
        .get("components")
        .and_then(Value::as_array)
        .ok_or_else(|| ValidationError::missing("$.surfaceUpdate", "components"))?;
    Ok((surface_id, entries))
}

fn collect_components(
    entries: &[Value],
) -> Result<(Vec<ComponentNode>, HashSet<String>), ValidationError> {
    let mut ids = HashSet::with_capacity(entries.len());
    let mut components = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let path = format!("$.surfaceUpdate.components[{i}]");
        let entry = entry
            .as_object()
            .ok_or_else(|| ValidationError::schema(&path, "component entry must be an object"))?;

        let id = entry
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ValidationError::missing(&path, "id"))?;

        if !ids.insert(id.to_string()) {
            return Err(ValidationError::SchemaInvalid {
                path,
                reason: format!("duplicate component id '{id}'"),
                missing_field: None,
                duplicate: Some(id.to_string()),
            });
        }

        let (kind, properties) = component_payload(entry, &path)?;
        components.push(ComponentNode::new(id, kind, properties));
    }

    Ok((components, ids))
}

/// Unwrap `{"<Kind>": {..}}` into the kind enum and its property map.
fn component_payload(
    entry: &Map<String, Value>,
    path: &str,
) -> Result<(ComponentKind, Map<String, Value>), ValidationError> {
    let component = match entry.get("component") {
        None => return Err(ValidationError::missing(path, "component")),
        Some(Value::Object(component)) => component,
        Some(_) => {
            return Err(ValidationError::schema(
                format!("{path}.component"),
                "component must be an object",
            ));
        }
    };

    let mut tags = component.iter();
    let (tag, payload) = match (tags.next(), tags.next()) {
        (Some(only), None) => only,
        _ => {
            return Err(ValidationError::schema(
                format!("{path}.component"),
                format!(
                    "component must have exactly one key naming its kind (found {})",
                    component.len()
                ),
            ));
        }
    };

    let kind = ComponentKind::from_tag(tag).ok_or_else(|| ValidationError::UnknownComponent {
        kind: tag.clone(),
        allowed_kinds: ComponentWhitelist::allowed_kinds()
            .into_iter()
            .map(String::from)
            .collect(),
    })?;

    let properties = payload.as_object().cloned().ok_or_else(|| {
        ValidationError::schema(
            format!("{path}.component.{tag}"),
            "component properties must be an object",
        )
    })?;

    Ok((kind, properties))
}

fn resolve_references(
    components: &[ComponentNode],
    ids: &HashSet<String>,
) -> Result<(), ValidationError> {
    for node in components {
        for (_, target) in node.references() {
            let resolved = target.as_str().is_some_and(|t| ids.contains(t));
            if !resolved {
                let target_id = match target {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Err(ValidationError::InvalidReference {
                    source_id: node.id.clone(),
                    target_id,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn surface(components: Value) -> String {
        json!({"surfaceUpdate": {"surfaceId": "s1", "components": components}}).to_string()
    }

    fn parse(raw: &str) -> Result<SurfaceDescription, ValidationError> {
        StructureValidator::new().parse(raw)
    }

    #[test]
    fn accepts_well_formed_surface() {
        let raw = surface(json!([
            {"id": "title", "component": {"Text": {"text": {"literalString": "Launch"}, "usageHint": "h1"}}},
            {"id": "region", "component": {"Select": {"options": [{"value": "us-east-1", "label": "US East"}]}}},
            {"id": "ok", "component": {"Alert": {"type": "success", "message": "Ready"}}}
        ]));
        let s = parse(&raw).unwrap();
        assert_eq!(s.surface_id, "s1");
        assert_eq!(s.ids().collect::<Vec<_>>(), vec!["title", "region", "ok"]);
        assert_eq!(s.components[1].kind, ComponentKind::Select);
    }

    #[test]
    fn malformed_json_reports_position() {
        let err = parse("{\"surfaceUpdate\":\n  {\"surfaceId\": }").unwrap_err();
        match err {
            ValidationError::JsonSyntax {
                line,
                column,
                position,
                ..
            } => {
                assert_eq!(line, 2);
                assert!(column > 0);
                assert_eq!(position, 18 + column - 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn position_counts_characters_not_bytes() {
        // "é" is two bytes; the column serde_json reports is a byte count.
        let raw = "ab\n\"é\"x";
        let position = char_position(raw, 2, 5);
        assert_eq!(position, 6);
        assert_eq!(raw.chars().nth(position), Some('x'));
        assert_eq!(char_position("ab", 1, 9), 2);
    }

    #[test]
    fn multibyte_prefix_keeps_position_in_range() {
        let raw = "{\"surfaceUpdate\": {\"surfaceId\": \"日本語\" ?}}";
        match parse(raw).unwrap_err() {
            ValidationError::JsonSyntax { position, .. } => {
                assert!(position < raw.chars().count());
                assert!(position > raw.find("日本語").unwrap_or(0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_surface_update() {
        let err = parse(r#"{"other": 1}"#).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_INVALID");
        assert_eq!(err.details()["missingField"], "surfaceUpdate");
    }

    #[test]
    fn missing_components_and_id() {
        let err = parse(r#"{"surfaceUpdate": {"surfaceId": "s"}}"#).unwrap_err();
        assert_eq!(err.details()["missingField"], "components");
        let err = parse(r#"{"surfaceUpdate": {"surfaceId": 7, "components": []}}"#).unwrap_err();
        assert_eq!(err.details()["missingField"], "surfaceId");
        assert_eq!(err.details()["path"], "$.surfaceUpdate");
    }

    #[test]
    fn unknown_component_lists_whitelist() {
        let err = parse(
            r#"{"surfaceUpdate":{"surfaceId":"s1","components":[{"id":"a","component":{"Bogus":{}}}]}}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "UNKNOWN_COMPONENT");
        match err {
            ValidationError::UnknownComponent {
                kind,
                allowed_kinds,
            } => {
                assert_eq!(kind, "Bogus");
                assert_eq!(allowed_kinds.len(), 7);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn forward_reference_accepted() {
        let raw = surface(json!([
            {"id": "go", "component": {"Button": {"action": {"name": "create_instance"}, "child": "go_label"}}},
            {"id": "go_label", "component": {"Text": {"text": {"literalString": "Go"}}}}
        ]));
        let s = parse(&raw).unwrap();
        assert_eq!(s.get("go").unwrap().child(), Some("go_label"));
    }

    #[test]
    fn dangling_reference_rejected() {
        let raw = surface(json!([
            {"id": "go", "component": {"Button": {"action": {"name": "create_instance"}, "child": "x"}}}
        ]));
        let err = parse(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidReference {
                source_id: "go".into(),
                target_id: "x".into()
            }
        );
    }

    #[test]
    fn non_string_reference_rejected() {
        let raw = surface(json!([
            {"id": "go", "component": {"Button": {"action": {"name": "a"}, "child": 5}}}
        ]));
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.details()["targetId"], "5");
    }

    #[test]
    fn duplicate_id_rejected() {
        let raw = surface(json!([
            {"id": "a", "component": {"Text": {"text": {"literalString": "one"}}}},
            {"id": "a", "component": {"Text": {"text": {"literalString": "two"}}}}
        ]));
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_INVALID");
        assert_eq!(err.details()["duplicate"], "a");
    }

    #[test]
    fn empty_id_rejected() {
        let raw = surface(json!([
            {"id": "", "component": {"Text": {"text": {"literalString": "x"}}}}
        ]));
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.details()["missingField"], "id");
    }

    #[test]
    fn multi_key_component_rejected() {
        let raw = surface(json!([
            {"id": "a", "component": {"Text": {"text": "x"}, "Button": {"action": {"name": "b"}}}}
        ]));
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_INVALID");
        assert!(err.to_string().contains("exactly one key"));
    }

    #[test]
    fn non_object_properties_rejected() {
        let raw = surface(json!([{"id": "a", "component": {"Text": "hello"}}]));
        let err = parse(&raw).unwrap_err();
        assert_eq!(err.details()["path"], "$.surfaceUpdate.components[0].component.Text");
    }

    #[test]
    fn script_rejected_but_prose_accepted() {
        let bad = surface(json!([
            {"id": "t", "component": {"Text": {"text": {"literalString": "<script>alert(1)</script>"}}}}
        ]));
        let err = parse(&bad).unwrap_err();
        assert_eq!(err.code(), "SECURITY_VIOLATION");
        assert_eq!(
            err.details()["path"],
            "$.surfaceUpdate.components[0].component.Text.text.literalString"
        );

        let uri = surface(json!([
            {"id": "b", "component": {"Button": {"action": {"name": "javascript:alert(1)"}}}}
        ]));
        assert_eq!(parse(&uri).unwrap_err().code(), "SECURITY_VIOLATION");

        let fine = surface(json!([
            {"id": "t", "component": {"Text": {"text": {"literalString": "script writing tips"}}}}
        ]));
        assert!(parse(&fine).is_ok());
    }

    #[test]
    fn security_scan_runs_before_kind_check() {
        let raw = surface(json!([
            {"id": "a", "component": {"Bogus": {"label": "javascript:void(0)"}}}
        ]));
        assert_eq!(parse(&raw).unwrap_err().code(), "SECURITY_VIOLATION");
    }

    #[test]
    fn first_violation_wins() {
        let raw = surface(json!([
            {"id": "a", "component": {"Bogus": {}}},
            {"id": "a", "component": {"Text": {"text": "x"}}}
        ]));
        assert_eq!(parse(&raw).unwrap_err().code(), "UNKNOWN_COMPONENT");
    }

    #[test]
    fn handler_attribute_in_text_rejected() {
        let raw = surface(json!([
            {"id": "t", "component": {"Text": {"text": {"literalString": "<details open ontoggle=alert(1)>"}}}}
        ]));
        assert_eq!(parse(&raw).unwrap_err().code(), "SECURITY_VIOLATION");
    }

    #[test]
    fn property_contracts_are_not_enforced() {
        // Contracts inform the prompt catalog only.
        let raw = surface(json!([
            {"id": "a", "component": {"Alert": {"type": "bogus"}}},
            {"id": "b", "component": {"Button": {}}}
        ]));
        assert_eq!(parse(&raw).unwrap().len(), 2);
    }

    #[test]
    fn validate_value_skips_decoding() {
        let doc = json!({"surfaceUpdate": {"surfaceId": "v", "components": []}});
        let s = StructureValidator::new().validate_value(&doc).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn custom_depth_bound() {
        let raw = surface(json!([
            {"id": "t", "component": {"Table": {"columns": [{"key": "a", "label": "A"}]}}}
        ]));
        let err = StructureValidator::new()
            .with_max_depth(4)
            .parse(&raw)
            .unwrap_err();
        assert!(err.to_string().contains("max depth"));
        assert!(StructureValidator::new().parse(&raw).is_ok());
    }
}
