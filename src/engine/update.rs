//! Update documents
//!
//! Either `{"$set": {"path": value}}` or a plain object, which is treated
//! as a `$set` of its top-level keys. `_id` is immutable.

use serde_json::{Map, Value};

use super::errors::{EngineError, EngineResult};

/// Parsed update: ordered path assignments
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    assignments: Vec<(String, Value)>,
}

impl Update {
    pub fn parse(spec: &Value) -> EngineResult<Self> {
        let obj = spec
            .as_object()
            .ok_or_else(|| EngineError::InvalidUpdate("expected an object".to_string()))?;

        let has_operators = obj.keys().any(|k| k.starts_with('$'));
        let sets = if has_operators {
            if let Some(op) = obj.keys().find(|k| k.as_str() != "$set") {
                return Err(EngineError::InvalidUpdate(format!(
                    "{} is not supported",
                    op
                )));
            }
            obj.get("$set")
                .and_then(Value::as_object)
                .ok_or_else(|| EngineError::InvalidUpdate("$set expects an object".to_string()))?
        } else {
            obj
        };

        let mut assignments = Vec::with_capacity(sets.len());
        for (path, value) in sets {
            if path == "_id" || path.starts_with("_id.") {
                return Err(EngineError::InvalidUpdate("_id is immutable".to_string()));
            }
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(EngineError::InvalidUpdate(format!(
                    "invalid path '{}'",
                    path
                )));
            }
            assignments.push((path.clone(), value.clone()));
        }
        Ok(Self { assignments })
    }

    /// Applies every assignment, creating intermediate objects.
    ///
    /// A non-object in the middle of a path is replaced by an object.
    pub fn apply(&self, document: &mut Value) {
        for (path, value) in &self.assignments {
            assign(document, path, value.clone());
        }
    }
}

fn assign(document: &mut Value, path: &str, value: Value) {
    let mut current = document;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let obj = match current.as_object_mut() {
            Some(obj) => obj,
            None => return,
        };
        if segments.peek().is_none() {
            obj.insert(segment.to_string(), value);
            return;
        }
        current = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object_update() {
        let update = Update::parse(&json!({"name": "Kirk"})).unwrap();
        let mut doc = json!({"_id": "1", "name": "Picard", "age": 59});
        update.apply(&mut doc);
        assert_eq!(doc, json!({"_id": "1", "name": "Kirk", "age": 59}));
    }

    #[test]
    fn test_set_dotted_path() {
        let update = Update::parse(&json!({"$set": {"nested.test": "x"}})).unwrap();
        let mut doc = json!({"nested": {"test": "y", "other": 1}});
        update.apply(&mut doc);
        assert_eq!(doc, json!({"nested": {"test": "x", "other": 1}}));
    }

    #[test]
    fn test_set_creates_parents() {
        let update = Update::parse(&json!({"$set": {"a.b.c": 1}})).unwrap();
        let mut doc = json!({"a": 5});
        update.apply(&mut doc);
        assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_rejects_other_operators() {
        assert!(matches!(
            Update::parse(&json!({"$inc": {"n": 1}})),
            Err(EngineError::InvalidUpdate(_))
        ));
        assert!(matches!(
            Update::parse(&json!({"$set": 1})),
            Err(EngineError::InvalidUpdate(_))
        ));
    }

    #[test]
    fn test_rejects_id() {
        assert!(Update::parse(&json!({"_id": "2"})).is_err());
        assert!(Update::parse(&json!({"$set": {"_id": "2"}})).is_err());
    }
}
