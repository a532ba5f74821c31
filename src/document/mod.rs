//! Plain document helpers
//!
//! Dotted-path access into `serde_json::Value` trees. Paths descend through
//! objects only; an array or scalar in the middle of a path means the path
//! is absent.

mod path;

pub use path::{get_path, get_path_mut, has_path, join_path, remove_path, set_path};
