//! Schema type definitions
//!
//! Field kinds:
//! - scalar: a single value with an optional getter chain
//! - scalar array: an array of values; a whole-array getter chain plus an
//!   element getter chain
//! - embedded: a single nested document described by a child schema
//! - embedded array: an array of nested documents described by a child schema
//!
//! Field paths are dot-separated and relative to the owning schema, so a
//! nested plain object (not a subdocument) is expressed as `"nested.test"`.

use std::sync::Arc;

use serde_json::Value;

use super::discriminator::{Discriminator, DEFAULT_DISCRIMINATOR_KEY};
use super::errors::{SchemaError, SchemaResult};
use super::getter::{GetterChain, GetterResult};

/// Field kinds
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Single value
    Scalar,
    /// Array of plain values
    ScalarArray,
    /// Nested document with its own schema
    Embedded(Arc<Schema>),
    /// Array of nested documents sharing one schema
    EmbeddedArray(Arc<Schema>),
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::ScalarArray => "scalar array",
            FieldKind::Embedded(_) => "embedded",
            FieldKind::EmbeddedArray(_) => "embedded array",
        }
    }
}

/// Field definition
#[derive(Debug, Clone)]
pub struct FieldDef {
    path: String,
    kind: FieldKind,
    getters: GetterChain,
    element_getters: GetterChain,
}

impl FieldDef {
    fn with_kind(path: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            path: path.into(),
            kind,
            getters: GetterChain::new(),
            element_getters: GetterChain::new(),
        }
    }

    /// Create a scalar field
    pub fn scalar(path: impl Into<String>) -> Self {
        Self::with_kind(path, FieldKind::Scalar)
    }

    /// Create a scalar array field
    pub fn scalar_array(path: impl Into<String>) -> Self {
        Self::with_kind(path, FieldKind::ScalarArray)
    }

    /// Create an embedded document field
    pub fn embedded(path: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_kind(path, FieldKind::Embedded(schema.into()))
    }

    /// Create an embedded document array field
    pub fn embedded_array(path: impl Into<String>, schema: impl Into<Arc<Schema>>) -> Self {
        Self::with_kind(path, FieldKind::EmbeddedArray(schema.into()))
    }

    /// Append a getter to the field's chain
    pub fn get<F>(mut self, getter: F) -> Self
    where
        F: Fn(Option<Value>, &Value) -> GetterResult<Option<Value>> + Send + Sync + 'static,
    {
        self.getters.push(getter);
        self
    }

    /// Append an element getter (scalar arrays only)
    pub fn element_get<F>(mut self, getter: F) -> Self
    where
        F: Fn(Option<Value>, &Value) -> GetterResult<Option<Value>> + Send + Sync + 'static,
    {
        self.element_getters.push(getter);
        self
    }

    /// Returns the path relative to the owning schema
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the field kind
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Returns the field's getter chain
    pub fn getters(&self) -> &GetterChain {
        &self.getters
    }

    /// Returns the element getter chain
    pub fn element_getters(&self) -> &GetterChain {
        &self.element_getters
    }

    /// Returns true if applying this field could change a document
    pub fn has_getters(&self) -> bool {
        !self.getters.is_empty() || !self.element_getters.is_empty()
    }
}

/// Complete schema definition
#[derive(Debug)]
pub struct Schema {
    /// Schema name, used in errors and logs
    name: String,
    /// Field definitions in declaration order
    fields: Vec<FieldDef>,
    /// Discriminator key and registered variants
    discriminator: Discriminator,
}

impl Schema {
    /// Start building a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub(super) fn from_parts(
        name: String,
        fields: Vec<FieldDef>,
        discriminator: Discriminator,
    ) -> Self {
        Self {
            name,
            fields,
            discriminator,
        }
    }

    /// Returns the schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by its relative path
    pub fn field(&self, path: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.path == path)
    }

    /// Returns the discriminator for this schema
    pub fn discriminator(&self) -> &Discriminator {
        &self.discriminator
    }

    /// Returns the discriminator key
    pub fn discriminator_key(&self) -> &str {
        self.discriminator.key()
    }

    /// Register a discriminated variant.
    ///
    /// The variant's effective schema holds this schema's fields followed by
    /// the child's, a child field replacing a base field with the same path.
    /// `value` defaults to the variant name.
    pub fn register_variant(
        &self,
        name: impl Into<String>,
        child: Schema,
        value: Option<Value>,
    ) -> SchemaResult<Arc<Schema>> {
        let name = name.into();
        let value = value.unwrap_or_else(|| Value::String(name.clone()));
        if !(value.is_string() || value.is_number()) {
            return Err(SchemaError::invalid_discriminator(
                &self.name,
                format!("variant '{}' value must be a string or number", name),
            ));
        }

        let mut fields: Vec<FieldDef> = self
            .fields
            .iter()
            .filter(|base| child.field(&base.path).is_none())
            .cloned()
            .collect();
        fields.extend(child.fields);

        let merged = Arc::new(Schema::from_parts(
            name.clone(),
            fields,
            Discriminator::new(self.discriminator.key()),
        ));

        self.discriminator
            .register(&self.name, name, value, Arc::clone(&merged))?;
        Ok(merged)
    }

    /// Effective schema for `doc`: the matching variant, if any
    pub fn variant_for(&self, doc: &Value) -> Option<Arc<Schema>> {
        self.discriminator.resolve(doc)
    }
}

/// Builder for `Schema`
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
    discriminator_key: Option<String>,
}

impl SchemaBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            discriminator_key: None,
        }
    }

    /// Add a field
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Override the discriminator key (defaults to `__t`)
    pub fn discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = Some(key.into());
        self
    }

    /// Validate and build the schema
    pub fn build(self) -> SchemaResult<Schema> {
        for (i, field) in self.fields.iter().enumerate() {
            if !is_valid_path(&field.path) {
                return Err(SchemaError::invalid_path(&self.name, &field.path));
            }
            if self.fields[..i].iter().any(|f| f.path == field.path) {
                return Err(SchemaError::duplicate_path(&self.name, &field.path));
            }
            let misplaced = match field.kind {
                FieldKind::Scalar => !field.element_getters.is_empty(),
                FieldKind::ScalarArray => false,
                FieldKind::Embedded(_) | FieldKind::EmbeddedArray(_) => field.has_getters(),
            };
            if misplaced {
                return Err(SchemaError::misplaced_getter(
                    &self.name,
                    &field.path,
                    field.kind.kind_name(),
                ));
            }
        }

        let key = self
            .discriminator_key
            .unwrap_or_else(|| DEFAULT_DISCRIMINATOR_KEY.to_string());
        if key.is_empty() {
            return Err(SchemaError::invalid_discriminator(
                &self.name,
                "discriminator key must not be empty",
            ));
        }

        Ok(Schema::from_parts(
            self.name,
            self.fields,
            Discriminator::new(key),
        ))
    }
}

fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(|segment| !segment.is_empty())
}
