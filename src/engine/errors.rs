//! Reference engine errors

use thiserror::Error;

use crate::projection::ProjectionError;
use crate::schema::GetterError;

/// Result type for reference engine queries
pub type EngineResult<T> = Result<T, EngineError>;

/// Reference engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Inserted or replacement document is not an object
    #[error("Invalid document: {0}")]
    InvalidDocument(&'static str),

    /// Filter is not an object of equality conditions
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Update uses an unsupported operator or touches `_id`
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// A document with this `_id` already exists
    #[error("Duplicate _id: {0}")]
    DuplicateId(String),

    /// Select string could not be parsed
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// An interceptor failed; the getter's error is carried unchanged
    #[error(transparent)]
    Getter(#[from] GetterError),

    /// Storage lock poisoned
    #[error("Storage unavailable: {0}")]
    Storage(String),
}
