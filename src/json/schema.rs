//! JSON Schema validation that reports every violation at once.

use std::fmt;

use serde_json::Value;

use super::JsonError;

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Field path such as `items[0].name`; `None` at the document root.
    pub path: Option<String>,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{path}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Validate `data` against `schema`, collecting all violations.
pub(crate) fn validate(schema: &Value, data: &Value) -> Result<(), JsonError> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| JsonError::InvalidSchema(e.to_string()))?;

    let errors: Vec<SchemaViolation> = validator
        .iter_errors(data)
        .map(|e| SchemaViolation {
            path: field_path(&e.instance_path.to_string()),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        return Ok(());
    }

    tracing::debug!(count = errors.len(), "schema validation failed");
    Err(JsonError::Schema { errors })
}

/// Render a JSON pointer (`/items/0/name`) as `items[0].name`.
fn field_path(pointer: &str) -> Option<String> {
    let mut path = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.parse::<usize>().is_ok() {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&segment);
        }
    }
    (!path.is_empty()).then_some(path)
}
