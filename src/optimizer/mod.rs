//! Rowid filter selection for the query optimizer
//!
//! # Flow
//!
//! 1. `CandidateGatherer` builds one cost model entry per usable index
//! 2. `Pruner` organizes the set once per table per statement
//! 3. `JoinOrderSelector` is asked, for every join order the search
//!    evaluates, which filter (if any) pays off at that cardinality
//!
//! # Invariants
//!
//! - Every organized candidate has a positive slope
//! - At most two unconditioned best filters, at the front
//! - Remaining candidates in ascending break-even order
//! - Selection never mutates the candidate set

mod candidates;
mod cost;
mod errors;
mod explain;
mod gather;
mod prune;
mod select;

pub use candidates::CandidateSet;
pub use cost::{
    ContainerKind, CostModel, FilterCandidate, IndexId, IndexSet, LineIntersection,
    ARRAY_LOOKUP_COST, ARRAY_SORT_COST, ARRAY_WRITE_COST, COND_EVAL_COST, TIME_FOR_COMPARE,
};
pub use errors::{OptimizerError, OptimizerResult, Severity};
pub use explain::{CandidateRole, ExplainCandidate, ExplainChoice, FilterExplain};
pub use gather::{CandidateGatherer, RangeEstimate, StaticTableStats, TableStatistics};
pub use prune::{ambiguous_indexes, PruneSummary, Pruner};
pub use select::JoinOrderSelector;

use crate::config::SessionConfig;
use crate::observability::{Logger, MetricsRegistry};

/// Gathers and organizes the rowid filter candidates of one table.
///
/// Errors abandon filter selection for this table only: they are logged
/// and the table is planned without filters.
pub fn plan_table_filters<S: TableStatistics>(
    table: &str,
    stats: &S,
    session: &SessionConfig,
    metrics: &MetricsRegistry,
) -> Option<CandidateSet> {
    metrics.increment_tables_planned();

    let mut set = match CandidateGatherer::new(session).build(stats) {
        Ok(Some(set)) => set,
        Ok(None) => return None,
        Err(e) => {
            Logger::error(
                "ROWID_FILTER_SELECTION_ABANDONED",
                &[("table", table), ("code", e.code()), ("reason", &e.to_string())],
            );
            return None;
        }
    };
    let gathered = set.len();
    metrics.add_candidates_gathered(gathered as u64);

    let summary = Pruner::organize(&mut set);
    metrics.add_candidates_unprofitable(summary.dropped as u64);
    metrics.add_candidates_ambiguous(summary.ambiguous as u64);

    Logger::info(
        "ROWID_FILTER_CANDIDATES_ORGANIZED",
        &[
            ("table", table),
            ("gathered", &gathered.to_string()),
            ("dropped", &summary.dropped.to_string()),
            ("ambiguous", &summary.ambiguous.to_string()),
            ("best", &summary.best.to_string()),
        ],
    );

    if set.is_empty() {
        None
    } else {
        Some(set)
    }
}
