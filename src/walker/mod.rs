//! Lean getter walker
//!
//! Re-applies field getters to plain query results.
//!
//! # Invariants
//!
//! - No-op when getters are disabled for the query
//! - Never synthesizes a field a result does not carry
//! - Getters run at most once per field per document
//! - Mutates in place; the caller's reference is returned

mod context;
mod walker;

pub use context::WalkContext;
pub use walker::{apply_getters, apply_to_document};
