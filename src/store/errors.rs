//! Store driver errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a store driver while opening, querying or reading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Filter uses an operator the driver does not understand
    #[error("Unsupported filter operator: {0}")]
    UnsupportedOperator(String),

    /// Filter is structurally invalid for the driver
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Cursor options were changed after iteration started
    #[error("Cursor already started; {0} can no longer be set")]
    CursorStarted(&'static str),

    /// Stored data could not be decoded
    #[error("Malformed document in '{collection}': {reason}")]
    MalformedDocument { collection: String, reason: String },

    /// Transport or driver failure
    #[error("Driver failure: {0}")]
    Driver(String),
}

impl StoreError {
    /// Shorthand for `Driver`
    pub fn driver(reason: impl Into<String>) -> Self {
        StoreError::Driver(reason.into())
    }
}
