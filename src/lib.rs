//! lean-getters - schema getters for plain query results
//!
//! Queries that return plain records skip the field getters a schema
//! declares. This crate puts them back: a hook installer attaches an
//! interceptor to a query engine, and a schema-driven walker re-applies
//! getters to each result in place, honoring projection, nested documents,
//! arrays and discriminated subtypes.

pub mod document;
pub mod engine;
pub mod hooks;
pub mod observability;
pub mod projection;
pub mod schema;
pub mod walker;

pub use hooks::{install, LeanGetters, LeanGettersOptions, LeanOptions, QueryContext};
pub use projection::Projection;
pub use schema::{FieldDef, GetterError, Schema};
pub use walker::{apply_getters, WalkContext};
