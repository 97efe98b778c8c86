//! CLI-specific error types
//!
//! All CLI errors are fatal to the command.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Session configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Statistics file could not be read
    #[error("Cannot read statistics file {path}: {source}")]
    StatsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Statistics file is not valid JSON of the expected shape
    #[error("Invalid statistics file {path}: {source}")]
    StatsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing to stdout failed
    #[error("Output error: {0}")]
    Output(#[from] io::Error),

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code(),
            CliError::StatsRead { .. } => "ROWID_FILTER_CLI_STATS_READ",
            CliError::StatsParse { .. } => "ROWID_FILTER_CLI_STATS_PARSE",
            CliError::Output(_) | CliError::Encode(_) => "ROWID_FILTER_CLI_OUTPUT",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
