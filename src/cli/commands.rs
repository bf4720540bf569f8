//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::compat::LegacyTrafficType;
use crate::config::RetrievalConfig;
use crate::observability::Logger;
use crate::query::ReportQuery;
use crate::retrieval::ReportDataSource;
use crate::store::MemoryStore;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_json_file, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
///
/// Failures are reported on stdout as an error envelope and returned.
/// Log lines go to stderr so stdout carries only the envelope.
pub fn run_command(cmd: Command) -> CliResult<()> {
    Logger::set_stderr_only(true);

    let result = match cmd {
        Command::Run {
            data,
            request,
            config,
        } => run_report(&data, &request, config.as_deref()),
        Command::Channels => Ok(channels()),
    };

    match result {
        Ok(data) => write_response(data),
        Err(err) => {
            write_error(err.code_str(), err.message())?;
            Err(err)
        }
    }
}

/// Loads the dataset and request files and runs one retrieval.
///
/// Returns the result table as `{"name", "columns", "rows"}`.
pub fn run_report(data: &Path, request: &Path, config: Option<&Path>) -> CliResult<Value> {
    let config = match config {
        Some(path) => RetrievalConfig::load(path)?,
        None => RetrievalConfig::default(),
    };
    config.apply_logging();

    let store = MemoryStore::from_dataset(read_json_file(data)?)?;
    let request: ReportQuery = serde_json::from_value(read_json_file(request)?)
        .map_err(|e| CliError::request_error(e.to_string()))?;

    let source = ReportDataSource::new(Arc::new(store)).with_config(config);
    let table = source.get_data(&request)?;
    Ok(serde_json::to_value(&table)?)
}

/// Traffic type codes with their channel identifiers
pub fn channels() -> Value {
    let entries: Vec<Value> = LegacyTrafficType::ALL
        .iter()
        .map(|t| {
            json!({
                "code": t.code(),
                "name": t.as_str(),
                "channel_id": t.channel_id().map(|id| id.to_string()),
            })
        })
        .collect();
    Value::Array(entries)
}
