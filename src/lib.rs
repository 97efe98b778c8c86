//! rowfilter - rowid filter cost model, selection and runtime filter
//!
//! A rowid filter is a sorted set of row locators built from a range scan
//! over a secondary index. Probing it lets the main access path of a table
//! skip fetching rows the range condition would reject anyway.
//!
//! - `optimizer`: cost model, candidate pruning, per-join-order choice
//! - `executor`: building and probing the chosen filter
//! - `config`, `observability`, `cli`: ambient plumbing

pub mod cli;
pub mod config;
pub mod executor;
pub mod observability;
pub mod optimizer;
