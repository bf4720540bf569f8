//! Retrieval configuration
//!
//! Loaded from a JSON file; every field has a default so `{}` is a valid
//! configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(String),

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Data source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Appended to the collection name to name result tables (default: "Data")
    #[serde(default = "default_table_name_suffix")]
    pub table_name_suffix: String,

    /// Minimum log severity (default: "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log each native filter document at TRACE (default: false)
    #[serde(default)]
    pub log_native_queries: bool,

    /// Most filters accepted on one request (default: 32)
    #[serde(default = "default_max_filters")]
    pub max_filters: usize,
}

fn default_table_name_suffix() -> String {
    "Data".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_max_filters() -> usize {
    32
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            table_name_suffix: default_table_name_suffix(),
            log_level: default_log_level(),
            log_native_queries: false,
            max_filters: default_max_filters(),
        }
    }
}

impl RetrievalConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_json_str(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.to_string_lossy().as_ref())],
        );
        Ok(config)
    }

    /// Parse and validate configuration from JSON text
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: RetrievalConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.table_name_suffix.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name_suffix must not be empty".to_string()));
        }
        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'",
                self.log_level
            )));
        }
        if self.max_filters == 0 {
            return Err(ConfigError::Invalid("max_filters must be > 0".to_string()));
        }
        Ok(())
    }

    /// Parsed log level; INFO if the level is not recognised
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Info)
    }

    /// Applies the log level to the process-wide logger
    pub fn apply_logging(&self) {
        Logger::set_min_severity(self.severity());
    }

    /// Result table name for a collection
    pub fn table_name(&self, collection: &str) -> String {
        format!("{}{}", collection, self.table_name_suffix)
    }
}
