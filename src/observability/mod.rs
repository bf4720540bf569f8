//! Observability for report retrieval
//!
//! - Structured logging (JSON lines)
//! - Retrieval counters
//! - Lifecycle scopes
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on retrieval results
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use reportsource::observability::{log_event_with_fields, Event, ObservationScope};
//!
//! let scope = ObservationScope::with_fields("RETRIEVAL", &[("collection", "Interactions")]);
//! log_event_with_fields(Event::FieldsAugmented, &[("field", "TrafficType")]);
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};

#[cfg(test)]
pub(crate) use logger::capture_lines;
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a pipeline event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a pipeline event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::ConfigLoaded);
        log_event(Event::RowsReconciled);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::FilterKeyOverwritten, &[("key", "Started")]);
    }
}
