//! Filter resolution errors

use thiserror::Error;

/// Result type for filter resolution
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while resolving filter specs to implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// No implementation is registered for the kind
    #[error("Unsupported filter kind: {0}")]
    UnsupportedFilterKind(String),

    /// The implementation rejected the spec's parameters
    #[error("Invalid parameters for filter '{name}' ({kind}): {reason}")]
    InvalidParameters {
        name: String,
        kind: String,
        reason: String,
    },
}

impl FilterError {
    /// Shorthand for `InvalidParameters`
    pub fn invalid(spec: &super::FilterSpec, reason: impl Into<String>) -> Self {
        FilterError::InvalidParameters {
            name: spec.name.clone(),
            kind: spec.kind.clone(),
            reason: reason.into(),
        }
    }

    /// Returns the kind that failed to resolve
    pub fn kind(&self) -> &str {
        match self {
            FilterError::UnsupportedFilterKind(kind) => kind,
            FilterError::InvalidParameters { kind, .. } => kind,
        }
    }
}
