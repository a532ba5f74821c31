//! Result source seam
//!
//! The narrow interface a query engine adapter implements so lean getters
//! can intercept its results. Nothing here knows about any particular
//! engine's hook API.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::context::QueryContext;
use super::errors::HookResult;
use crate::schema::GetterResult;

/// Single-result operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SingleResultOp {
    FindOne,
    FindOneAndUpdate,
    FindOneAndDelete,
    FindOneAndReplace,
}

impl SingleResultOp {
    /// Every single-result operation
    pub const ALL: [SingleResultOp; 4] = [
        SingleResultOp::FindOne,
        SingleResultOp::FindOneAndUpdate,
        SingleResultOp::FindOneAndDelete,
        SingleResultOp::FindOneAndReplace,
    ];

    /// Operation name for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            SingleResultOp::FindOne => "findOne",
            SingleResultOp::FindOneAndUpdate => "findOneAndUpdate",
            SingleResultOp::FindOneAndDelete => "findOneAndDelete",
            SingleResultOp::FindOneAndReplace => "findOneAndReplace",
        }
    }
}

impl fmt::Display for SingleResultOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ways a source can intercept multi-result and cursor reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkHook {
    /// Called once per record as it is produced
    ItemMap,
    /// Called on the assembled result
    ResultTransform,
    /// Transform function carried in the query options
    OptionsTransform,
}

impl BulkHook {
    /// Preference order; the first supported mechanism is used
    pub const PRIORITY: [BulkHook; 3] = [
        BulkHook::ItemMap,
        BulkHook::ResultTransform,
        BulkHook::OptionsTransform,
    ];

    /// Mechanism name for logs
    pub fn name(&self) -> &'static str {
        match self {
            BulkHook::ItemMap => "item_map",
            BulkHook::ResultTransform => "result_transform",
            BulkHook::OptionsTransform => "options_transform",
        }
    }
}

impl fmt::Display for BulkHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Interceptor for multi-result reads: a record or an array of records
pub type BulkInterceptor = Arc<dyn Fn(&mut Value, &QueryContext) -> GetterResult<()> + Send + Sync>;

/// Interceptor for single-result reads: the record, or `None` if nothing matched
pub type SingleInterceptor =
    Arc<dyn Fn(Option<&mut Value>, &QueryContext) -> GetterResult<()> + Send + Sync>;

/// Wraps a closure as a [`BulkInterceptor`]
pub fn bulk_interceptor<F>(f: F) -> BulkInterceptor
where
    F: Fn(&mut Value, &QueryContext) -> GetterResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a closure as a [`SingleInterceptor`]
pub fn single_interceptor<F>(f: F) -> SingleInterceptor
where
    F: Fn(Option<&mut Value>, &QueryContext) -> GetterResult<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A query engine whose results can be intercepted
pub trait ResultSource {
    /// Whether the source offers this bulk mechanism
    fn supports_bulk_hook(&self, hook: BulkHook) -> bool;

    /// Whether the source can intercept this single-result operation
    fn supports_single_hook(&self, op: SingleResultOp) -> bool;

    /// Register the interceptor on multi-result and cursor reads
    fn register_bulk_hook(&mut self, hook: BulkHook, interceptor: BulkInterceptor) -> HookResult<()>;

    /// Register the interceptor on a single-result operation
    fn register_single_hook(
        &mut self,
        op: SingleResultOp,
        interceptor: SingleInterceptor,
    ) -> HookResult<()>;
}
