//! Per-query walk context

use crate::projection::Projection;

/// What the walker needs from the query being answered
#[derive(Debug, Clone, Copy)]
pub struct WalkContext<'a> {
    getters_enabled: bool,
    projection: &'a Projection,
}

impl<'a> WalkContext<'a> {
    /// Create a context
    pub fn new(getters_enabled: bool, projection: &'a Projection) -> Self {
        Self {
            getters_enabled,
            projection,
        }
    }

    /// Context with getters enabled
    pub fn enabled(projection: &'a Projection) -> Self {
        Self::new(true, projection)
    }

    /// Context with getters disabled (walker is a no-op)
    pub fn disabled(projection: &'a Projection) -> Self {
        Self::new(false, projection)
    }

    /// Whether getters run for this query
    pub fn getters_enabled(&self) -> bool {
        self.getters_enabled
    }

    /// The query's projection
    pub fn projection(&self) -> &'a Projection {
        self.projection
    }
}
