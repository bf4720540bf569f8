//! CLI module for reportsource
//!
//! Provides command-line interface for:
//! - run: Load a dataset into memory and run one report request
//! - channels: Print the legacy traffic type to channel mapping

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{channels, run, run_command, run_report};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json_file, write_error, write_error_to, write_response, write_response_to};
