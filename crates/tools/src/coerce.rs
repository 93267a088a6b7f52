//! Form-value coercion and required-parameter checks.
//!
//! Form submissions arrive as strings. Each declared parameter is converted
//! to its declared type where the string parses; otherwise the submitted
//! value is left alone and the handler sees it unchanged.

use genui_core::{ParamSpec, ParamType};
use serde_json::{Map, Number, Value};

/// Coerce every declared parameter in `params`. Undeclared keys pass through.
///
/// An optional parameter submitted as `""` is removed entirely.
pub fn coerce_params(specs: &[ParamSpec], mut params: Map<String, Value>) -> Map<String, Value> {
    for spec in specs {
        let raw = match params.get(&spec.name) {
            Some(Value::String(raw)) => raw.clone(),
            _ => continue,
        };
        if raw.is_empty() {
            if !spec.required {
                params.remove(&spec.name);
            }
            continue;
        }
        if let Some(coerced) = coerce_value(spec.param_type, &raw) {
            params.insert(spec.name.clone(), coerced);
        }
    }
    params
}

/// Convert one non-empty string to `param_type`, or `None` if it does not parse.
pub fn coerce_value(param_type: ParamType, raw: &str) -> Option<Value> {
    match param_type {
        ParamType::String => None,
        ParamType::Number => parse_number(raw.trim()),
        ParamType::Boolean => Some(Value::Bool(raw == "true" || raw == "1")),
        ParamType::Object => parse_object(raw.trim()),
        ParamType::Array => parse_array(raw.trim()),
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::from(i));
    }
    if let Ok(u) = raw.parse::<u64>() {
        return Some(Value::from(u));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn parse_object(raw: &str) -> Option<Value> {
    if raw.starts_with('{') {
        return serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_object);
    }
    let mut map = Map::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=')?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        map.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Some(Value::Object(map))
}

fn parse_array(raw: &str) -> Option<Value> {
    if raw.starts_with('[') {
        return serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_array);
    }
    Some(Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    ))
}

/// Names of required parameters that are absent, null, or empty strings.
pub fn missing_required(specs: &[ParamSpec], params: &Map<String, Value>) -> Vec<String> {
    specs
        .iter()
        .filter(|spec| spec.required)
        .filter(|spec| match params.get(&spec.name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        })
        .map(|spec| spec.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specs() -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("name", ParamType::String),
            ParamSpec::optional("count", ParamType::Number),
            ParamSpec::optional("ratio", ParamType::Number),
            ParamSpec::optional("monitoring", ParamType::Boolean),
            ParamSpec::optional("tags", ParamType::Object),
            ParamSpec::optional("groups", ParamType::Array),
            ParamSpec::optional("note", ParamType::String),
        ]
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn numbers_and_booleans() {
        let out = coerce_params(
            &specs(),
            params(json!({"name": "web", "count": "42", "ratio": "0.5", "monitoring": "true"})),
        );
        assert_eq!(out["count"], json!(42));
        assert!(out["count"].is_i64());
        assert_eq!(out["ratio"], json!(0.5));
        assert_eq!(out["monitoring"], json!(true));
        assert_eq!(out["name"], json!("web"));
    }

    #[test]
    fn boolean_forms() {
        assert_eq!(coerce_value(ParamType::Boolean, "1"), Some(json!(true)));
        assert_eq!(coerce_value(ParamType::Boolean, "on"), Some(json!(false)));
        assert_eq!(coerce_value(ParamType::Boolean, "false"), Some(json!(false)));
    }

    #[test]
    fn empty_optional_is_dropped() {
        let out = coerce_params(&specs(), params(json!({"name": "web", "note": ""})));
        assert!(!out.contains_key("note"));
    }

    #[test]
    fn empty_required_is_kept_but_missing() {
        let s = specs();
        let out = coerce_params(&s, params(json!({"name": ""})));
        assert!(out.contains_key("name"));
        assert_eq!(missing_required(&s, &out), vec!["name".to_string()]);
    }

    #[test]
    fn objects_from_pairs_and_json() {
        assert_eq!(
            coerce_value(ParamType::Object, "env=prod, team = web"),
            Some(json!({"env": "prod", "team": "web"}))
        );
        assert_eq!(
            coerce_value(ParamType::Object, r#"{"env": "prod", "n": 1}"#),
            Some(json!({"env": "prod", "n": 1}))
        );
        assert_eq!(coerce_value(ParamType::Object, "not a pair"), None);
        assert_eq!(coerce_value(ParamType::Object, "{broken"), None);
    }

    #[test]
    fn arrays_from_csv_and_json() {
        assert_eq!(
            coerce_value(ParamType::Array, "sg-1, sg-2,,"),
            Some(json!(["sg-1", "sg-2"]))
        );
        assert_eq!(
            coerce_value(ParamType::Array, "[1, 2]"),
            Some(json!([1, 2]))
        );
    }

    #[test]
    fn unparseable_and_undeclared_pass_through() {
        let out = coerce_params(
            &specs(),
            params(json!({"name": "web", "count": "many", "extra": "7"})),
        );
        assert_eq!(out["count"], json!("many"));
        assert_eq!(out["extra"], json!("7"));
    }

    #[test]
    fn non_string_values_untouched() {
        let out = coerce_params(&specs(), params(json!({"name": "web", "count": 3, "tags": {"a": 1}})));
        assert_eq!(out["count"], json!(3));
        assert_eq!(out["tags"], json!({"a": 1}));
    }

    #[test]
    fn missing_counts_null_and_absent() {
        let s = vec![
            ParamSpec::required("a", ParamType::String),
            ParamSpec::required("b", ParamType::Number),
            ParamSpec::required("c", ParamType::Boolean),
        ];
        let p = params(json!({"a": null, "c": false}));
        assert_eq!(missing_required(&s, &p), vec!["a".to_string(), "b".to_string()]);
    }
}
