//! Query translation errors

use thiserror::Error;

/// Result type for query translation
pub type TranslateResult<T> = Result<T, TranslateError>;

/// Errors raised while turning a report query into a native query
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TranslateError {
    /// Query text could not be parsed
    #[error("Malformed query text: {0}")]
    Malformed(String),

    /// Filter section is not a valid filter document
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A placeholder has no bound parameter
    #[error("Unbound parameter: @{0}")]
    UnboundParameter(String),

    /// Parameter list is not usable
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Translated query has an invalid shape
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
