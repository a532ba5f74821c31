//! Observability
//!
//! - Structured logging (JSON lines)
//! - Counters
//! - Typed events
//!
//! Observability is read-only and never fails the operation it observes.
//!
//! ```ignore
//! use lean_getters::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
