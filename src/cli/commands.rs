//! CLI command implementations

use std::path::Path;

use crate::config::SessionConfig;
use crate::observability::{Logger, MetricsRegistry};
use crate::optimizer::{
    plan_table_filters, ExplainChoice, FilterExplain, IndexId, JoinOrderSelector,
    StaticTableStats, TableStatistics,
};

use super::args::Command;
use super::errors::CliResult;
use super::io::{read_stats, write_json, write_text};

/// Join order position to choose a filter for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinPosition {
    pub ref_key: Option<IndexId>,
    pub prefix_rows: f64,
    pub table_rows: f64,
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Explain {
            config,
            stats,
            ref_key,
            prefix_rows,
            table_rows,
            json,
        } => {
            let position = match (prefix_rows, table_rows) {
                (Some(prefix_rows), Some(table_rows)) => Some(JoinPosition {
                    ref_key: ref_key.map(IndexId),
                    prefix_rows,
                    table_rows,
                }),
                _ => None,
            };
            explain(config.as_deref(), &stats, position, json)
        }
    }
}

/// Organize the candidates of the table in `stats_path` and print them
pub fn explain(
    config_path: Option<&Path>,
    stats_path: &Path,
    position: Option<JoinPosition>,
    json: bool,
) -> CliResult<()> {
    let session = match config_path {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    Logger::set_min_severity(session.severity()?);

    let stats = read_stats(stats_path)?;
    let metrics = MetricsRegistry::new();
    let explain = explain_table(&session, &stats, position, &metrics);

    if json {
        write_json(&explain)
    } else {
        write_text(&explain.to_string())
    }
}

/// Builds the explain output for one table and, optionally, one join
/// order position.
pub fn explain_table(
    session: &SessionConfig,
    stats: &StaticTableStats,
    position: Option<JoinPosition>,
    metrics: &MetricsRegistry,
) -> FilterExplain {
    let set = plan_table_filters(&stats.table, stats, session, metrics);
    let explain = FilterExplain::from_set(stats.table.clone(), set.as_ref());

    let Some(position) = position else {
        return explain;
    };

    let selector = match position.ref_key {
        Some(key) => JoinOrderSelector::with_intersected(stats.intersected_with(key)),
        None => JoinOrderSelector::new(),
    };
    let chosen = selector.choose(
        set.as_ref(),
        position.ref_key,
        position.prefix_rows,
        position.table_rows,
    );
    if chosen.is_some() {
        metrics.increment_filters_chosen();
    }

    explain.with_choice(ExplainChoice::new(
        position.ref_key.map(|k| k.0),
        position.prefix_rows * position.table_rows,
        chosen,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::RangeEstimate;

    fn stats() -> StaticTableStats {
        StaticTableStats {
            table: "orders".into(),
            rows: 1_000_000.0,
            ref_length: 8,
            ranges: vec![
                RangeEstimate {
                    index: IndexId(1),
                    rows: 1_000.0,
                    index_only_cost: 20.0,
                },
                RangeEstimate {
                    index: IndexId(2),
                    rows: 5_000.0,
                    index_only_cost: 40.0,
                },
            ],
            intersections: Vec::new(),
        }
    }

    #[test]
    fn test_explain_without_position() {
        let metrics = MetricsRegistry::new();
        let explain = explain_table(&SessionConfig::default(), &stats(), None, &metrics);
        assert_eq!(explain.table, "orders");
        assert_eq!(explain.candidates.len(), 2);
        assert!(explain.choice.is_none());
    }

    #[test]
    fn test_explain_with_position() {
        let metrics = MetricsRegistry::new();
        let position = JoinPosition {
            ref_key: Some(IndexId(7)),
            prefix_rows: 1_000.0,
            table_rows: 10.0,
        };
        let explain = explain_table(&SessionConfig::default(), &stats(), Some(position), &metrics);

        let choice = explain.choice.unwrap();
        assert_eq!(choice.cardinality, 10_000.0);
        assert_eq!(choice.chosen_index, Some(1));
        assert_eq!(metrics.snapshot().filters_chosen, 1);
    }

    #[test]
    fn test_explain_disabled_session() {
        let session = SessionConfig {
            rowid_filter: false,
            ..Default::default()
        };
        let metrics = MetricsRegistry::new();
        let position = JoinPosition {
            ref_key: None,
            prefix_rows: 1_000.0,
            table_rows: 10.0,
        };
        let explain = explain_table(&session, &stats(), Some(position), &metrics);
        assert!(explain.candidates.is_empty());
        assert_eq!(explain.choice.unwrap().chosen_index, None);
    }
}
