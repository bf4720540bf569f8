//! Report query as received from the caller

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filters::FilterSpec;

use super::errors::{TranslateError, TranslateResult};

fn parameter_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("parameter name pattern is valid")
    })
}

/// Returns true if `name` can be bound as `@name` in query text
pub fn is_valid_parameter_name(name: &str) -> bool {
    parameter_name_pattern().is_match(name)
}

/// A named query parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    pub value: Value,
}

impl QueryParameter {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Abstract report query: query text, ordered parameters, ordered filters.
///
/// Immutable once handed to a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Query text understood by the translator
    pub query_text: String,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<QueryParameter>,
    /// Filters in injection order
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

impl ReportQuery {
    pub fn new(query_text: impl Into<String>) -> Self {
        Self {
            query_text: query_text.into(),
            parameters: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Adds a parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.push(QueryParameter::new(name, value));
        self
    }

    /// Adds a filter; filters are injected in the order added
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    /// Rejects blank query text and unusable parameter lists
    pub fn validate(&self) -> TranslateResult<()> {
        if self.query_text.trim().is_empty() {
            return Err(TranslateError::InvalidQuery("query text is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.parameters.len());
        for param in &self.parameters {
            if !is_valid_parameter_name(&param.name) {
                return Err(TranslateError::InvalidParameter(format!(
                    "'{}' is not a valid parameter name",
                    param.name
                )));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(TranslateError::InvalidParameter(format!(
                    "parameter '{}' bound twice",
                    param.name
                )));
            }
        }

        Ok(())
    }
}
