//! Validation errors: one per rejected surface, never aggregated.

use serde_json::{Value, json};
use thiserror::Error;

/// Why a candidate surface was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("JSON syntax error at line {line}, column {column}: {message}")]
    JsonSyntax {
        message: String,
        line: usize,
        column: usize,
        /// Character offset into the input.
        position: usize,
    },

    #[error("Schema invalid at {path}: {reason}")]
    SchemaInvalid {
        path: String,
        reason: String,
        missing_field: Option<String>,
        duplicate: Option<String>,
    },

    #[error("Unknown component kind '{kind}'")]
    UnknownComponent {
        kind: String,
        allowed_kinds: Vec<String>,
    },

    #[error("Component '{source_id}' references missing component '{target_id}'")]
    InvalidReference { source_id: String, target_id: String },

    #[error("Dangerous content ({pattern}) at {path}")]
    SecurityViolation {
        path: String,
        pattern: String,
        snippet: String,
    },
}

impl ValidationError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::SchemaInvalid {
            path: path.into(),
            reason: reason.into(),
            missing_field: None,
            duplicate: None,
        }
    }

    pub(crate) fn missing(path: impl Into<String>, field: &str) -> Self {
        ValidationError::SchemaInvalid {
            path: path.into(),
            reason: format!("missing or mistyped field '{field}'"),
            missing_field: Some(field.to_string()),
            duplicate: None,
        }
    }

    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::JsonSyntax { .. } => "JSON_SYNTAX",
            ValidationError::SchemaInvalid { .. } => "SCHEMA_INVALID",
            ValidationError::UnknownComponent { .. } => "UNKNOWN_COMPONENT",
            ValidationError::InvalidReference { .. } => "INVALID_REFERENCE",
            ValidationError::SecurityViolation { .. } => "SECURITY_VIOLATION",
        }
    }

    /// Structured details, camelCase keys.
    pub fn details(&self) -> Value {
        match self {
            ValidationError::JsonSyntax {
                line,
                column,
                position,
                ..
            } => json!({ "line": line, "column": column, "position": position }),
            ValidationError::SchemaInvalid {
                path,
                missing_field,
                duplicate,
                ..
            } => {
                let mut details = json!({ "path": path });
                if let Some(field) = missing_field {
                    details["missingField"] = json!(field);
                }
                if let Some(id) = duplicate {
                    details["duplicate"] = json!(id);
                }
                details
            }
            ValidationError::UnknownComponent {
                kind,
                allowed_kinds,
            } => json!({ "kind": kind, "allowedKinds": allowed_kinds }),
            ValidationError::InvalidReference {
                source_id,
                target_id,
            } => json!({ "sourceId": source_id, "targetId": target_id }),
            ValidationError::SecurityViolation {
                path,
                pattern,
                snippet,
            } => json!({ "path": path, "pattern": pattern, "snippet": snippet }),
        }
    }

    /// `{code, message, details}` payload.
    pub fn to_payload(&self) -> Value {
        json!({
            "code": self.code(),
            "message": self.to_string(),
            "details": self.details(),
        })
    }
}
