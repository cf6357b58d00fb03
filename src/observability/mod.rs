//! Observability for filedrop
//!
//! - Structured JSON logging, one line per [`Event`]
//! - Monotonic counters in [`MetricsRegistry`]
//!
//! Observability never fails an operation: log writes ignore I/O errors.

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

fn severity_of(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_error() {
        Severity::Error
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_of(event), event.as_str(), &[]);
}

/// Log an event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}
