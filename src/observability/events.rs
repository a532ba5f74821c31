//! Observability events
//!
//! Events are explicit and typed. Per-result and per-query events log at
//! TRACE so they stay silent under the default threshold. Getter failures
//! have no event: they reach the caller as errors and are only counted.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    /// Discriminator variant registered on a schema
    VariantRegistered,
    /// Bulk hook mechanism chosen for a result source
    BulkHookSelected,
    /// Single-result hook registered
    SingleHookRegistered,
    /// All hooks installed
    HooksInstalled,

    // Per result
    /// Getters applied to a result
    GettersApplied,
    /// Result passed through because getters are disabled
    GettersSkipped,

    // Reference engine
    /// Query answered
    QueryExecuted,
    /// Query failed
    QueryRejected,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::VariantRegistered => "SCHEMA_VARIANT_REGISTERED",
            Event::BulkHookSelected => "BULK_HOOK_SELECTED",
            Event::SingleHookRegistered => "SINGLE_HOOK_REGISTERED",
            Event::HooksInstalled => "LEAN_GETTERS_INSTALLED",
            Event::GettersApplied => "GETTERS_APPLIED",
            Event::GettersSkipped => "GETTERS_SKIPPED",
            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRejected => "QUERY_REJECTED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::HooksInstalled => Severity::Info,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
