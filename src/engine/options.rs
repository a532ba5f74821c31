//! Query options and source capabilities

use crate::hooks::{BulkHook, LeanOptions, SingleResultOp};
use crate::projection::Projection;

use super::errors::EngineResult;

/// Per-query options
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Fields returned
    pub projection: Projection,
    /// `lean({ getters })`
    pub lean: LeanOptions,
    /// For find-and-modify: return the document after the write
    pub return_new: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the projection from a select string such as `"name -age"`
    pub fn select(mut self, spec: &str) -> EngineResult<Self> {
        self.projection = Projection::parse(spec)?;
        Ok(self)
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Sets `lean({ getters })`
    pub fn getters(mut self, enabled: bool) -> Self {
        self.lean = LeanOptions::getters(enabled);
        self
    }

    pub fn return_new(mut self, return_new: bool) -> Self {
        self.return_new = return_new;
        self
    }
}

/// Which hook points a collection exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub(super) bulk_hooks: Vec<BulkHook>,
    pub(super) unsupported_single: Vec<SingleResultOp>,
}

impl Capabilities {
    /// Every bulk mechanism and every single-result operation
    pub fn all() -> Self {
        Self {
            bulk_hooks: BulkHook::PRIORITY.to_vec(),
            unsupported_single: Vec::new(),
        }
    }

    /// Only the given bulk mechanisms
    pub fn bulk_only(hooks: &[BulkHook]) -> Self {
        Self {
            bulk_hooks: hooks.to_vec(),
            unsupported_single: Vec::new(),
        }
    }

    /// Refuse hook registration on `op`
    pub fn without_single(mut self, op: SingleResultOp) -> Self {
        if !self.unsupported_single.contains(&op) {
            self.unsupported_single.push(op);
        }
        self
    }

    pub fn supports_bulk(&self, hook: BulkHook) -> bool {
        self.bulk_hooks.contains(&hook)
    }

    pub fn supports_single(&self, op: SingleResultOp) -> bool {
        !self.unsupported_single.contains(&op)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}
