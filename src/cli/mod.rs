//! CLI module for rowfilter
//!
//! Provides command-line interface for:
//! - explain: organize a table's filter candidates and show the choice for
//!   one join order position

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, explain_table, run, run_command, JoinPosition};
pub use errors::{CliError, CliResult};
pub use io::{read_stats, write_json, write_text};
