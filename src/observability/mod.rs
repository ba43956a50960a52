//! Observability for query processing
//!
//! Structured JSON lines on stderr, one per event. Observability is
//! read-only: nothing logged here changes a query's result, and a failed
//! write to stderr is ignored.
//!
//! Severity is filtered process-wide (`Logger::set_min_severity`, default
//! WARN). Per-stage events log at TRACE, query outcomes at INFO, failures
//! at ERROR.
//!
//! ```ignore
//! use flatquery::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TableLoaded, &[("table", "orders"), ("rows", "3")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{ObservationScope, Timer};

/// Severity an event is logged at
pub fn event_severity(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else if event.is_stage() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log an event
pub fn log_event(event: Event) {
    Logger::log(event_severity(event), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}
