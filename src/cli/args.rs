//! CLI argument definitions using clap
//!
//! Commands:
//! - reportsource run --data <path> --request <path> [--config <path>]
//! - reportsource channels

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// reportsource - report data retrieval over document stores
#[derive(Parser, Debug)]
#[command(name = "reportsource")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one report request against an in-memory dataset
    Run {
        /// Dataset file: {"collection": [documents...]}
        #[arg(long)]
        data: PathBuf,

        /// Report request file
        #[arg(long)]
        request: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the traffic type to channel mapping
    Channels,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "reportsource",
            "run",
            "--data",
            "data.json",
            "--request",
            "req.json",
        ])
        .unwrap();
        match cli.command {
            Command::Run {
                data,
                request,
                config,
            } => {
                assert_eq!(data, PathBuf::from("data.json"));
                assert_eq!(request, PathBuf::from("req.json"));
                assert!(config.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_run_requires_request() {
        assert!(Cli::try_parse_from(["reportsource", "run", "--data", "d.json"]).is_err());
    }
}
