//! Observable events of the retrieval pipeline
//!
//! Events are explicit and typed. Lifecycle begin/complete/failed lines are
//! written by `ObservationScope`; the events here mark the steps in between.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration loaded
    ConfigLoaded,
    /// Native query produced by the translator
    QueryTranslated,
    /// Report filters injected into the filter document
    FiltersInjected,
    /// A filter replaced a key another filter had set
    FilterKeyOverwritten,
    /// Classifier field added to the projection
    FieldsAugmented,
    /// Store cursor opened and narrowed
    QueryExecuted,
    /// Rows materialized from the cursor
    RowsMaterialized,
    /// Channel identifiers reconciled
    RowsReconciled,
    /// A traffic type value could not be read as a code
    TrafficTypeUnconvertible,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryTranslated => "QUERY_TRANSLATED",
            Event::FiltersInjected => "FILTERS_INJECTED",
            Event::FilterKeyOverwritten => "FILTER_KEY_OVERWRITTEN",
            Event::FieldsAugmented => "FIELDS_AUGMENTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::RowsMaterialized => "ROWS_MATERIALIZED",
            Event::RowsReconciled => "ROWS_RECONCILED",
            Event::TrafficTypeUnconvertible => "TRAFFIC_TYPE_UNCONVERTIBLE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::FilterKeyOverwritten | Event::TrafficTypeUnconvertible => Severity::Warn,
            Event::QueryTranslated => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
