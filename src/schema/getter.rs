//! Field getters
//!
//! A getter maps a raw stored value to the value callers see. Getters take
//! and return `Option<Value>`: `None` is "undefined", which is distinct from
//! an explicit JSON `null`. The second argument is the owning document.
//!
//! Getters on one field form a chain and run in registration order, each
//! receiving the previous output.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Error raised by a user-supplied getter.
///
/// The walker never wraps or translates this; whatever a getter returns
/// reaches the caller as-is.
#[derive(Debug)]
pub struct GetterError {
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl GetterError {
    /// Create a getter error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error
    pub fn wrap(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for GetterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "getter failed: {}", self.message)
    }
}

impl std::error::Error for GetterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for getter invocations
pub type GetterResult<T> = Result<T, GetterError>;

/// A single getter function
pub type Getter = Arc<dyn Fn(Option<Value>, &Value) -> GetterResult<Option<Value>> + Send + Sync>;

/// Ordered getters declared on one field
#[derive(Clone, Default)]
pub struct GetterChain {
    getters: Vec<Getter>,
}

impl GetterChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a getter
    pub fn push<F>(&mut self, getter: F)
    where
        F: Fn(Option<Value>, &Value) -> GetterResult<Option<Value>> + Send + Sync + 'static,
    {
        self.getters.push(Arc::new(getter));
    }

    /// Returns true if no getter is declared
    pub fn is_empty(&self) -> bool {
        self.getters.is_empty()
    }

    /// Number of getters in the chain
    pub fn len(&self) -> usize {
        self.getters.len()
    }

    /// Runs every getter in order. An empty chain returns `value` unchanged.
    pub fn apply(&self, value: Option<Value>, owner: &Value) -> GetterResult<Option<Value>> {
        let mut current = value;
        for getter in &self.getters {
            current = getter(current, owner)?;
        }
        Ok(current)
    }
}

impl fmt::Debug for GetterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterChain")
            .field("len", &self.getters.len())
            .finish()
    }
}
