//! Hook installation errors

use thiserror::Error;

/// Result type for hook installation
pub type HookResult<T> = Result<T, HookError>;

/// Hook installation errors
#[derive(Debug, Error)]
pub enum HookError {
    /// The result source offers none of the bulk hook mechanisms
    #[error("Result source exposes no bulk hook point (item map, result transform or options transform)")]
    NoBulkHookPoint,

    /// The result source cannot intercept this operation
    #[error("Result source does not support hooks on {0}")]
    Unsupported(&'static str),

    /// An interceptor is already registered on this hook point
    #[error("Hook already registered on {0}")]
    AlreadyRegistered(&'static str),

    /// Plugin options could not be parsed
    #[error("Invalid lean getters options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
