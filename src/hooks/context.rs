//! Query context
//!
//! Carried from the query layer to interceptors. Holds what the walker
//! reads: the lean options and the projection.

use uuid::Uuid;

use super::options::LeanOptions;
use crate::projection::Projection;

/// Context handed to interceptors for one query
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Query ID for log correlation
    pub query_id: Uuid,

    /// Lean options set on the query
    pub lean: LeanOptions,

    /// Projection the query was answered with
    pub projection: Projection,
}

impl QueryContext {
    /// Create a context with no lean options and no projection
    pub fn new() -> Self {
        Self {
            query_id: Uuid::new_v4(),
            lean: LeanOptions::default(),
            projection: Projection::none(),
        }
    }

    /// Set the lean options
    pub fn with_lean(mut self, lean: LeanOptions) -> Self {
        self.lean = lean;
        self
    }

    /// Set the projection
    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}
