//! Projection context
//!
//! Paths are full dotted paths from the result root. `_id` is selected by
//! an inclusive projection unless it is excluded explicitly.

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::{ProjectionError, ProjectionResult};
use crate::document::join_path;

const ID_FIELD: &str = "_id";

/// Selection mode of a projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    /// Everything selected
    #[default]
    None,
    /// Only listed paths (and `_id`) selected
    Inclusive,
    /// Everything except listed paths selected
    Exclusive,
}

/// Per-query projection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    mode: ProjectionMode,
    /// Path -> included (true) or excluded (false)
    fields: BTreeMap<String, bool>,
}

impl Projection {
    /// Projection selecting everything
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses a space-separated projection: `"name items"` or `"-name"`
    pub fn parse(spec: &str) -> ProjectionResult<Self> {
        let entries = spec.split_whitespace().map(|token| {
            match token.strip_prefix('-') {
                Some(path) => (path.to_string(), false),
                None => (token.trim_start_matches('+').to_string(), true),
            }
        });
        Self::from_entries(entries)
    }

    /// Parses a projection document: `{"name": 1}` or `{"name": 0}`
    pub fn from_json(spec: &Value) -> ProjectionResult<Self> {
        let obj = match spec {
            Value::Object(obj) => obj,
            Value::Null => return Ok(Self::none()),
            other => return Err(ProjectionError::NotAnObject(json_type_name(other))),
        };

        let mut entries = Vec::with_capacity(obj.len());
        for (path, value) in obj {
            let include = match value {
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
                other => {
                    return Err(ProjectionError::UnsupportedValue {
                        path: path.clone(),
                        value: other.to_string(),
                    })
                }
            };
            entries.push((path.clone(), include));
        }
        Self::from_entries(entries)
    }

    fn from_entries(entries: impl IntoIterator<Item = (String, bool)>) -> ProjectionResult<Self> {
        let mut fields = BTreeMap::new();
        for (path, include) in entries {
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(ProjectionError::InvalidPath(path));
            }
            fields.insert(path, include);
        }

        let include = fields
            .iter()
            .find(|(path, included)| **included && path.as_str() != ID_FIELD);
        let exclude = fields
            .iter()
            .find(|(path, included)| !**included && path.as_str() != ID_FIELD);

        let mode = match (include, exclude) {
            (Some((include, _)), Some((exclude, _))) => {
                return Err(ProjectionError::MixedProjection {
                    include: include.clone(),
                    exclude: exclude.clone(),
                })
            }
            (Some(_), None) => ProjectionMode::Inclusive,
            (None, Some(_)) => ProjectionMode::Exclusive,
            (None, None) => match fields.get(ID_FIELD) {
                Some(true) => ProjectionMode::Inclusive,
                Some(false) => ProjectionMode::Exclusive,
                None => ProjectionMode::None,
            },
        };

        Ok(Self { mode, fields })
    }

    /// Returns the selection mode
    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// True if this projection lists included paths
    pub fn is_inclusive(&self) -> bool {
        self.mode == ProjectionMode::Inclusive
    }

    /// True if this projection lists excluded paths
    pub fn is_exclusive(&self) -> bool {
        self.mode == ProjectionMode::Exclusive
    }

    /// Included under an inclusive projection: listed, under a listed
    /// ancestor, or above a listed descendant.
    pub fn is_selected(&self, path: &str) -> bool {
        if is_id_path(path) {
            return self.fields.get(ID_FIELD) != Some(&false);
        }
        self.fields.iter().any(|(listed, included)| {
            *included
                && (listed == path
                    || is_ancestor(listed, path)
                    || is_ancestor(path, listed))
        })
    }

    /// Excluded under an exclusive projection: the path or an ancestor is
    /// listed as excluded.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.fields
            .iter()
            .any(|(listed, included)| !*included && (listed == path || is_ancestor(listed, path)))
    }

    /// Whether a value at `path` can appear in a result under this projection
    pub fn admits(&self, path: &str) -> bool {
        match self.mode {
            ProjectionMode::None => true,
            ProjectionMode::Inclusive => self.is_selected(path),
            ProjectionMode::Exclusive => !self.is_excluded(path),
        }
    }

    /// Materializes this projection on a stored document
    pub fn apply(&self, doc: &Value) -> Value {
        match self.mode {
            ProjectionMode::None => doc.clone(),
            ProjectionMode::Inclusive => self.include(doc, ""),
            ProjectionMode::Exclusive => {
                let mut out = doc.clone();
                for (path, included) in &self.fields {
                    if !*included {
                        let segments: Vec<&str> = path.split('.').collect();
                        remove_through_arrays(&mut out, &segments);
                    }
                }
                out
            }
        }
    }

    fn include(&self, value: &Value, prefix: &str) -> Value {
        match value {
            Value::Object(obj) => {
                let mut out = serde_json::Map::new();
                for (key, child) in obj {
                    let path = join_path(prefix, key);
                    if self.covers(&path) {
                        out.insert(key.clone(), child.clone());
                    } else if self.is_selected(&path) {
                        match child {
                            Value::Object(_) | Value::Array(_) => {
                                out.insert(key.clone(), self.include(child, &path));
                            }
                            _ => {}
                        }
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|item| item.is_object() || item.is_array())
                    .map(|item| self.include(item, prefix))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Path is listed, or sits under a listed path (whole value kept)
    fn covers(&self, path: &str) -> bool {
        if is_id_path(path) {
            return self.fields.get(ID_FIELD) != Some(&false);
        }
        self.fields
            .iter()
            .any(|(listed, included)| *included && (listed == path || is_ancestor(listed, path)))
    }
}

fn remove_through_arrays(value: &mut Value, segments: &[&str]) {
    match value {
        Value::Object(obj) => match segments {
            [] => {}
            [last] => {
                obj.remove(*last);
            }
            [first, rest @ ..] => {
                if let Some(child) = obj.get_mut(*first) {
                    remove_through_arrays(child, rest);
                }
            }
        },
        Value::Array(items) => {
            for item in items {
                remove_through_arrays(item, segments);
            }
        }
        _ => {}
    }
}

/// True if `ancestor` is a strict dotted prefix of `path`
fn is_ancestor(ancestor: &str, path: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'.'
}

fn is_id_path(path: &str) -> bool {
    path == ID_FIELD || is_ancestor(ID_FIELD, path)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
