//! Projection errors

use thiserror::Error;

/// Result type for projection parsing
pub type ProjectionResult<T> = Result<T, ProjectionError>;

/// Projection parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// Inclusion and exclusion used together (other than `_id`)
    #[error("Cannot mix inclusion and exclusion in one projection: '{include}' and '{exclude}'")]
    MixedProjection { include: String, exclude: String },

    /// Value is not a number or boolean
    #[error("Unsupported projection value for '{path}': {value}")]
    UnsupportedValue { path: String, value: String },

    /// Path is empty or has an empty segment
    #[error("Invalid projection path: '{0}'")]
    InvalidPath(String),

    /// Projection document is not an object
    #[error("Projection must be an object, got {0}")]
    NotAnObject(&'static str),
}
