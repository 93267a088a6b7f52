//! Dangerous-content scan over arbitrary decoded JSON.
//!
//! Every string in the document, object keys included, is matched against a
//! fixed pattern set. Matching is deliberately narrow: the word "script" on
//! its own is harmless, `<script` is not.

use regex_lite::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::warn;

use crate::error::ValidationError;

/// Longest snippet attached to a violation.
const SNIPPET_CHARS: usize = 100;

/// A named dangerous-content pattern.
pub struct DangerousPattern {
    pub name: &'static str,
    regex: Regex,
}

impl DangerousPattern {
    fn find(&self, text: &str) -> Option<usize> {
        self.regex.find(text).map(|m| m.start())
    }
}

const PATTERN_SOURCES: &[(&str, &str)] = &[
    ("script_tag", r"(?i)<\s*/?\s*script\b"),
    ("javascript_uri", r"(?i)\b(?:java|vb)script\s*:"),
    ("event_handler", r"(?i)\bon[a-z]+\s*="),
    ("eval_call", r"\beval\s*\("),
    ("function_constructor", r"\bFunction\s*\("),
    ("timer_call", r"\bset(?:Timeout|Interval|Immediate)\s*\("),
    (
        "global_object",
        r"\b(?:document|window|globalThis)(?:\.[A-Za-z_$]|\s*\[)|\b(?:localStorage|sessionStorage)\b",
    ),
    (
        "prototype_pollution",
        r"__proto__|\bconstructor\s*\.\s*prototype\b|\bconstructor\s*\[\s*.prototype",
    ),
];

static PATTERNS: LazyLock<Vec<DangerousPattern>> = LazyLock::new(|| {
    PATTERN_SOURCES
        .iter()
        .map(|(name, source)| DangerousPattern {
            name,
            regex: Regex::new(source).expect("built-in security pattern must compile"),
        })
        .collect()
});

/// The compiled pattern set.
pub fn patterns() -> &'static [DangerousPattern] {
    &PATTERNS
}

/// First pattern matching `text`, with the byte offset of the match.
pub fn find_dangerous(text: &str) -> Option<(&'static str, usize)> {
    patterns()
        .iter()
        .find_map(|p| p.find(text).map(|start| (p.name, start)))
}

/// Depth-first walk; the first dangerous string fails the scan.
pub(crate) fn scan(value: &Value, max_depth: usize) -> Result<(), ValidationError> {
    walk(value, "$", 0, max_depth)
}

fn walk(value: &Value, path: &str, depth: usize, max_depth: usize) -> Result<(), ValidationError> {
    if depth > max_depth {
        return Err(ValidationError::schema(
            path,
            format!("nesting exceeds max depth {max_depth}"),
        ));
    }
    match value {
        Value::String(s) => check(s, path),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, &format!("{path}[{i}]"), depth + 1, max_depth)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for (key, item) in map {
                let child_path = format!("{path}.{key}");
                check(key, &child_path)?;
                walk(item, &child_path, depth + 1, max_depth)?;
            }
            Ok(())
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => Ok(()),
    }
}

fn check(text: &str, path: &str) -> Result<(), ValidationError> {
    let Some((pattern, start)) = find_dangerous(text) else {
        return Ok(());
    };
    let snippet: String = text[start..].chars().take(SNIPPET_CHARS).collect();
    warn!(path, pattern, "Security scan rejected surface content");
    Err(ValidationError::SecurityViolation {
        path: path.to_string(),
        pattern: pattern.to_string(),
        snippet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pattern_of(text: &str) -> Option<&'static str> {
        find_dangerous(text).map(|(name, _)| name)
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(patterns().len(), PATTERN_SOURCES.len());
    }

    #[test]
    fn flags_script_and_uri() {
        assert_eq!(pattern_of("<script>alert(1)</script>"), Some("script_tag"));
        assert_eq!(pattern_of("< SCRIPT src=x>"), Some("script_tag"));
        assert_eq!(pattern_of("javascript:alert(1)"), Some("javascript_uri"));
        assert_eq!(pattern_of("JavaScript :void(0)"), Some("javascript_uri"));
    }

    #[test]
    fn flags_handlers_and_code() {
        assert_eq!(pattern_of(r#"<img onerror="x">"#), Some("event_handler"));
        assert_eq!(pattern_of("onClick = doIt"), Some("event_handler"));
        assert_eq!(pattern_of("eval (payload)"), Some("eval_call"));
        assert_eq!(pattern_of("new Function('return 1')"), Some("function_constructor"));
        assert_eq!(pattern_of("setTimeout(f, 10)"), Some("timer_call"));
        assert_eq!(pattern_of("document.cookie"), Some("global_object"));
        assert_eq!(pattern_of("window['location']"), Some("global_object"));
        assert_eq!(pattern_of("localStorage"), Some("global_object"));
        assert_eq!(pattern_of("__proto__"), Some("prototype_pollution"));
        assert_eq!(pattern_of("constructor.prototype"), Some("prototype_pollution"));
    }

    #[test]
    fn flags_any_handler_attribute() {
        for text in [
            "<details open ontoggle=alert(1)>",
            "<div onanimationstart=alert(1)>",
            "<input onfocusin=alert(1)>",
            "<body onbeforeunload=steal()>",
            "<div oncontextmenu=x()>",
            "<p oncopy=x()>",
            "<a ondrag=x()>",
            "<svg onbegin=alert(1)>",
        ] {
            assert_eq!(pattern_of(text), Some("event_handler"), "missed {text:?}");
        }
    }

    #[test]
    fn no_false_positives_on_prose() {
        for text in [
            "script writing tips",
            "Read the manuscript: chapter 2",
            "This function (x) returns y",
            "Close the window. Then reopen the document.",
            "Evaluate the options",
            "condition = ready",
            "Turn monitoring on = recommended",
        ] {
            assert_eq!(pattern_of(text), None, "false positive on {text:?}");
        }
    }

    #[test]
    fn scan_reports_path_and_snippet() {
        let doc = json!({"a": [{"b": "ok"}, {"c": "see javascript:alert(1)"}]});
        let err = scan(&doc, 64).unwrap_err();
        match err {
            ValidationError::SecurityViolation {
                path,
                pattern,
                snippet,
            } => {
                assert_eq!(path, "$.a[1].c");
                assert_eq!(pattern, "javascript_uri");
                assert!(snippet.starts_with("javascript:"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scan_checks_keys() {
        let doc = json!({"__proto__": {"polluted": true}});
        let err = scan(&doc, 64).unwrap_err();
        assert_eq!(err.code(), "SECURITY_VIOLATION");
    }

    #[test]
    fn snippet_is_bounded() {
        let long = format!("<script>{}", "x".repeat(500));
        let err = scan(&json!({ "t": long }), 64).unwrap_err();
        match err {
            ValidationError::SecurityViolation { snippet, .. } => {
                assert_eq!(snippet.chars().count(), 100)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn depth_is_bounded() {
        let mut doc = json!("leaf");
        for _ in 0..10 {
            doc = json!([doc]);
        }
        assert!(scan(&doc, 10).is_ok());
        let err = scan(&json!([doc]), 10).unwrap_err();
        assert_eq!(err.code(), "SCHEMA_INVALID");
    }
}
