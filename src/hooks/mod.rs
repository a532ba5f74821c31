//! Lean getters hook installation
//!
//! Binds a schema to a result source. The source calls back on every
//! multi-result, cursor and single-result read; the callback resolves
//! whether getters are on for the query and runs the walker.
//!
//! # Invariants
//!
//! - Exactly one bulk mechanism is registered per installation
//! - All four single-result operations are registered
//! - Registration failures abort installation
//! - Getter failures surface to the caller unchanged

mod context;
mod errors;
mod installer;
mod options;
mod source;

pub use context::QueryContext;
pub use errors::{HookError, HookResult};
pub use installer::{install, Installation, LeanGetters};
pub use options::{LeanGettersOptions, LeanOptions};
pub use source::{
    bulk_interceptor, single_interceptor, BulkHook, BulkInterceptor, ResultSource,
    SingleInterceptor, SingleResultOp,
};
