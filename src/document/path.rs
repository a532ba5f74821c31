//! Dotted path access
//!
//! Presence is key presence: `{"a": null}` has `a`, `{}` does not.

use serde_json::Value;

/// Joins a prefix and a relative path
pub fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}.{}", prefix, path)
    }
}

/// Returns the value at `path`, if present
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |current, segment| current.as_object()?.get(segment))
}

/// Returns a mutable reference to the value at `path`, if present
pub fn get_path_mut<'a>(doc: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.')
        .try_fold(doc, |current, segment| current.as_object_mut()?.get_mut(segment))
}

/// Returns true if every segment of `path` is present
pub fn has_path(doc: &Value, path: &str) -> bool {
    get_path(doc, path).is_some()
}

/// Overwrites the value at an existing `path`.
///
/// Returns false without touching `doc` if the parent is missing or is not
/// an object. Intermediate objects are never created.
pub fn set_path(doc: &mut Value, path: &str, value: Value) -> bool {
    let (parent, last) = split_last(path);
    let target = match parent {
        Some(parent) => get_path_mut(doc, parent),
        None => Some(doc),
    };
    match target.and_then(Value::as_object_mut) {
        Some(obj) => {
            obj.insert(last.to_string(), value);
            true
        }
        None => false,
    }
}

/// Removes the key at `path`, returning its value if it was present
pub fn remove_path(doc: &mut Value, path: &str) -> Option<Value> {
    let (parent, last) = split_last(path);
    let target = match parent {
        Some(parent) => get_path_mut(doc, parent)?,
        None => doc,
    };
    target.as_object_mut()?.remove(last)
}

fn split_last(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('.') {
        Some((parent, last)) => (Some(parent), last),
        None => (None, path),
    }
}
