//! Schema error types
//!
//! Error codes:
//! - LEAN_SCHEMA_DUPLICATE_PATH
//! - LEAN_SCHEMA_INVALID_PATH
//! - LEAN_SCHEMA_DUPLICATE_VARIANT
//! - LEAN_SCHEMA_INVALID_DISCRIMINATOR
//! - LEAN_SCHEMA_MISPLACED_GETTER
//!
//! Schema errors are setup-time only. Nothing in the walker produces them.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Two fields declared with the same path
    LeanSchemaDuplicatePath,
    /// Field path is empty or has an empty segment
    LeanSchemaInvalidPath,
    /// Variant name or discriminator value registered twice
    LeanSchemaDuplicateVariant,
    /// Discriminator key or value is unusable
    LeanSchemaInvalidDiscriminator,
    /// Getter declared on a field kind that never applies it
    LeanSchemaMisplacedGetter,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::LeanSchemaDuplicatePath => "LEAN_SCHEMA_DUPLICATE_PATH",
            SchemaErrorCode::LeanSchemaInvalidPath => "LEAN_SCHEMA_INVALID_PATH",
            SchemaErrorCode::LeanSchemaDuplicateVariant => "LEAN_SCHEMA_DUPLICATE_VARIANT",
            SchemaErrorCode::LeanSchemaInvalidDiscriminator => {
                "LEAN_SCHEMA_INVALID_DISCRIMINATOR"
            }
            SchemaErrorCode::LeanSchemaMisplacedGetter => "LEAN_SCHEMA_MISPLACED_GETTER",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    /// Schema name if applicable
    schema: Option<String>,
    /// Offending field path or variant name
    subject: Option<String>,
}

impl SchemaError {
    /// Create a duplicate path error
    pub fn duplicate_path(schema: impl Into<String>, path: impl Into<String>) -> Self {
        let schema = schema.into();
        let path = path.into();
        Self {
            code: SchemaErrorCode::LeanSchemaDuplicatePath,
            message: format!("Schema '{}' declares path '{}' more than once", schema, path),
            schema: Some(schema),
            subject: Some(path),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(schema: impl Into<String>, path: impl Into<String>) -> Self {
        let schema = schema.into();
        let path = path.into();
        Self {
            code: SchemaErrorCode::LeanSchemaInvalidPath,
            message: format!("Schema '{}' has malformed path '{}'", schema, path),
            schema: Some(schema),
            subject: Some(path),
        }
    }

    /// Create a duplicate variant error
    pub fn duplicate_variant(schema: impl Into<String>, variant: impl Into<String>) -> Self {
        let schema = schema.into();
        let variant = variant.into();
        Self {
            code: SchemaErrorCode::LeanSchemaDuplicateVariant,
            message: format!(
                "Schema '{}' already has a discriminator variant '{}'",
                schema, variant
            ),
            schema: Some(schema),
            subject: Some(variant),
        }
    }

    /// Create an invalid discriminator error
    pub fn invalid_discriminator(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        let schema = schema.into();
        Self {
            code: SchemaErrorCode::LeanSchemaInvalidDiscriminator,
            message: format!("Schema '{}': {}", schema, reason.into()),
            schema: Some(schema),
            subject: None,
        }
    }

    /// Create a misplaced getter error
    pub fn misplaced_getter(
        schema: impl Into<String>,
        path: impl Into<String>,
        kind: &str,
    ) -> Self {
        let schema = schema.into();
        let path = path.into();
        Self {
            code: SchemaErrorCode::LeanSchemaMisplacedGetter,
            message: format!(
                "Schema '{}' path '{}': {} fields cannot carry this getter",
                schema, path, kind
            ),
            schema: Some(schema),
            subject: Some(path),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema name if applicable
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns the offending path or variant
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
