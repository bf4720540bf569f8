//! Report retrieval
//!
//! Turns a `ReportQuery` into a `ResultTable`:
//! - `augment`: adds `TrafficType` to Interactions projections that need it
//! - `executor`: opens and narrows the store cursor in a fixed order
//! - `reconcile`: fills empty channel identifiers after materialization
//! - `source`: `ReportDataSource::get_data`, the pipeline tying them together

mod augment;
mod errors;
mod executor;
mod reconcile;
mod source;

pub use augment::{augment, AugmentedFields};
pub use errors::{RetrievalError, RetrievalResult};
pub use executor::QueryExecutor;
pub use reconcile::{reconcile, ReconcileStats};
pub use source::ReportDataSource;
