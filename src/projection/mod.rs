//! Query projection
//!
//! The projection decides which paths a result carries. The walker only
//! reads it, to avoid running getters on paths a query did not select.

mod errors;
mod projection;

pub use errors::{ProjectionError, ProjectionResult};
pub use projection::{Projection, ProjectionMode};
