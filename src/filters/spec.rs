//! Filter specifications attached to report queries

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, typed filter as attached to a report query.
///
/// `kind` selects the implementation; `parameters` is interpreted by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Instance name, used in diagnostics
    pub name: String,
    /// Implementation key
    pub kind: String,
    /// Kind-specific parameters
    #[serde(default)]
    pub parameters: Value,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            parameters,
        }
    }

    /// Returns a string parameter, if present
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }

    /// Returns a raw parameter, if present and not null
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key).filter(|v| !v.is_null())
    }
}
