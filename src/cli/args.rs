//! CLI argument definitions using clap
//!
//! Commands:
//! - rowfilter explain [--config <path>] --stats <path> [--ref-key K]
//!   [--prefix-rows N --table-rows M] [--json]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rowfilter - rowid filter cost model and selection explorer
#[derive(Parser, Debug)]
#[command(name = "rowfilter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Organize the filter candidates of a table and explain them
    Explain {
        /// Path to session configuration file (defaults apply without one)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to table statistics file
        #[arg(long)]
        stats: PathBuf,

        /// Index used for direct (ref) access in the join order
        #[arg(long)]
        ref_key: Option<u32>,

        /// Rows produced by the join prefix
        #[arg(long, requires = "table_rows")]
        prefix_rows: Option<f64>,

        /// Rows read from this table per prefix row
        #[arg(long, requires = "prefix_rows")]
        table_rows: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
