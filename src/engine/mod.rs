//! Reference query engine
//!
//! A small in-memory document collection that implements `ResultSource`,
//! so lean getters can be installed and exercised end to end. It is an
//! adapter for tests and demonstrations, not a storage engine: no
//! persistence, indexes or query operators beyond equality.
//!
//! Supported:
//! - Equality filters on dotted paths
//! - Projection via select strings
//! - `find`, cursors, `findOne`
//! - `findOneAndUpdate` (`$set` or plain object), `findOneAndDelete`,
//!   `findOneAndReplace`
//!
//! Results are always copies; interceptors never reach stored documents.

mod collection;
mod errors;
mod filter;
mod options;
mod update;

pub use collection::{Collection, Cursor};
pub use errors::{EngineError, EngineResult};
pub use filter::Filter;
pub use options::{Capabilities, QueryOptions};
pub use update::Update;
