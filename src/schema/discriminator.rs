//! Discriminated variants
//!
//! A schema may carry variants keyed by the value stored under its
//! discriminator key. Resolution is a pure lookup: the first variant whose
//! declared value equals `doc[key]` wins, and no match means the base
//! schema applies.
//!
//! Variants are registered during setup. Registration takes the write lock,
//! so it must not overlap with in-flight traversals of the same schema.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::types::Schema;
use crate::observability::{log_event_with_fields, Event};

/// Key used when a schema does not name one
pub const DEFAULT_DISCRIMINATOR_KEY: &str = "__t";

/// A registered variant
#[derive(Debug, Clone)]
pub struct Variant {
    /// Registration name
    pub name: String,
    /// Value matched against `doc[key]`
    pub value: Value,
    /// Effective schema for matching documents
    pub schema: Arc<Schema>,
}

/// Discriminator key plus registered variants
#[derive(Debug)]
pub struct Discriminator {
    key: String,
    variants: RwLock<Vec<Variant>>,
}

impl Discriminator {
    /// Create a discriminator with no variants
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            variants: RwLock::new(Vec::new()),
        }
    }

    /// Returns the discriminator key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true if no variant is registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered variant names in registration order
    pub fn variant_names(&self) -> Vec<String> {
        self.read().iter().map(|v| v.name.clone()).collect()
    }

    pub(super) fn register(
        &self,
        schema_name: &str,
        name: String,
        value: Value,
        schema: Arc<Schema>,
    ) -> SchemaResult<()> {
        let mut variants = self
            .variants
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if variants.iter().any(|v| v.name == name || v.value == value) {
            return Err(SchemaError::duplicate_variant(schema_name, name));
        }

        log_event_with_fields(
            Event::VariantRegistered,
            &[
                ("schema", schema_name),
                ("variant", name.as_str()),
                ("key", self.key.as_str()),
            ],
        );

        variants.push(Variant {
            name,
            value,
            schema,
        });
        Ok(())
    }

    /// Finds the variant schema for `doc`.
    ///
    /// Returns `None` when there are no variants, `doc` is not an object,
    /// the key is missing, or no variant declares the stored value.
    pub fn resolve(&self, doc: &Value) -> Option<Arc<Schema>> {
        let stored = doc.as_object()?.get(&self.key)?;
        self.read()
            .iter()
            .find(|v| &v.value == stored)
            .map(|v| Arc::clone(&v.schema))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Variant>> {
        self.variants
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
