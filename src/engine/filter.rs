//! Equality filtering
//!
//! Exact match only, no coercion. Keys may be dotted paths into embedded
//! objects. A `null` condition matches a missing or null field.

use serde_json::Value;

use super::errors::{EngineError, EngineResult};
use crate::document::get_path;

/// One `path == value` condition
#[derive(Debug, Clone, PartialEq)]
struct Condition {
    path: String,
    expected: Value,
}

/// Conjunction of equality conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses `{"path": value, ...}`
    pub fn parse(spec: &Value) -> EngineResult<Self> {
        let obj = match spec {
            Value::Null => return Ok(Self::all()),
            Value::Object(obj) => obj,
            other => {
                return Err(EngineError::InvalidFilter(format!(
                    "expected an object, got {}",
                    other
                )))
            }
        };

        let mut conditions = Vec::with_capacity(obj.len());
        for (path, expected) in obj {
            if path.starts_with('$') {
                return Err(EngineError::InvalidFilter(format!(
                    "operator {} is not supported",
                    path
                )));
            }
            conditions.push(Condition {
                path: path.clone(),
                expected: expected.clone(),
            });
        }
        Ok(Self { conditions })
    }

    /// All conditions must hold
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|cond| match get_path(document, &cond.path) {
                Some(actual) => actual == &cond.expected,
                None => cond.expected.is_null(),
            })
    }
}
