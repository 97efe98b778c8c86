//! File input and stdout output for the CLI
//!
//! - Input: table statistics as a single JSON object
//! - Output: explain text, or one JSON object
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::optimizer::StaticTableStats;

use super::errors::{CliError, CliResult};

/// Read a table statistics file
pub fn read_stats(path: &Path) -> CliResult<StaticTableStats> {
    let content = fs::read_to_string(path).map_err(|source| CliError::StatsRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::StatsParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write explain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Write a JSON value to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
