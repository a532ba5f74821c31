//! Schema descriptors for lean getters
//!
//! A schema describes which fields of a plain record carry getters and how
//! nested documents, arrays and discriminated subtypes are shaped.
//!
//! # Design Principles
//!
//! - Immutable once built; only discriminator variants are added later,
//!   during setup
//! - Field order is declaration order
//! - Shared across queries through `Arc<Schema>`

mod discriminator;
mod errors;
mod getter;
mod types;

pub use discriminator::{Discriminator, Variant, DEFAULT_DISCRIMINATOR_KEY};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use getter::{Getter, GetterChain, GetterError, GetterResult};
pub use types::{FieldDef, FieldKind, Schema, SchemaBuilder};
