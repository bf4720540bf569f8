//! Retrieval error types
//!
//! Error codes:
//! - REPORT_INVALID_REQUEST: request rejected before any work
//! - REPORT_TRANSLATION_FAILED: translator could not produce a native query
//! - REPORT_FILTER_RESOLUTION: a filter spec did not resolve; no store round-trip made
//! - REPORT_STORE_EXECUTION: driver failure, propagated unchanged

use thiserror::Error;

use crate::filters::FilterError;
use crate::query::TranslateError;
use crate::store::StoreError;

/// Result type for retrieval
pub type RetrievalResult<T> = Result<T, RetrievalError>;

/// Failure of one `get_data` call; no partial table accompanies it
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RetrievalError {
    /// Request is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Translation failed
    #[error(transparent)]
    Translation(#[from] TranslateError),

    /// A filter spec could not be resolved
    #[error(transparent)]
    FilterResolution(#[from] FilterError),

    /// Store failed during cursor creation or iteration
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RetrievalError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        RetrievalError::InvalidRequest(reason.into())
    }

    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RetrievalError::InvalidRequest(_) => "REPORT_INVALID_REQUEST",
            RetrievalError::Translation(_) => "REPORT_TRANSLATION_FAILED",
            RetrievalError::FilterResolution(_) => "REPORT_FILTER_RESOLUTION",
            RetrievalError::Store(_) => "REPORT_STORE_EXECUTION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            RetrievalError::invalid_request("x").code(),
            "REPORT_INVALID_REQUEST"
        );
        assert_eq!(
            RetrievalError::from(FilterError::UnsupportedFilterKind("k".to_string())).code(),
            "REPORT_FILTER_RESOLUTION"
        );
        assert_eq!(
            RetrievalError::from(StoreError::driver("down")).code(),
            "REPORT_STORE_EXECUTION"
        );
        assert_eq!(
            RetrievalError::from(TranslateError::Malformed("x".to_string())).code(),
            "REPORT_TRANSLATION_FAILED"
        );
    }

    #[test]
    fn test_store_error_message_unchanged() {
        let err = RetrievalError::from(StoreError::driver("connection reset"));
        assert_eq!(err.to_string(), StoreError::driver("connection reset").to_string());
    }
}
