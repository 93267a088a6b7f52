//! Canonical encoder for validated surfaces.
//!
//! Components keep their original order; every object key inside a
//! component is sorted lexicographically. Printing a parsed print is a
//! fixed point: `print(parse(print(s))) == print(s)`.

use serde_json::{Map, Value, json};

use crate::model::SurfaceDescription;

/// The wire-format value of a surface, canonicalized.
pub fn to_value(surface: &SurfaceDescription) -> Value {
    let components: Vec<Value> = surface
        .components
        .iter()
        .map(|node| {
            let mut tagged = Map::new();
            tagged.insert(
                node.kind.as_str().to_string(),
                canonicalize(&Value::Object(node.properties.clone())),
            );
            json!({ "id": node.id, "component": Value::Object(tagged) })
        })
        .collect();

    json!({
        "surfaceUpdate": {
            "surfaceId": surface.surface_id,
            "components": components,
        }
    })
}

/// Compact canonical text of a surface.
pub fn print(surface: &SurfaceDescription) -> String {
    to_value(surface).to_string()
}

/// Recursively rebuild `value` with object keys inserted in sorted order.
///
/// Holds whether or not serde_json's `preserve_order` feature is enabled.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key.as_str()]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
