//! Candidate gathering
//!
//! Every secondary index with a usable range condition whose expected row
//! count fits the session's filter budget becomes a candidate.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::observability::Logger;

use super::candidates::CandidateSet;
use super::cost::{ContainerKind, CostModel, FilterCandidate, IndexId, IndexSet};
use super::errors::{OptimizerError, OptimizerResult};

/// Range access estimate for one index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEstimate {
    /// Index the range condition applies to
    pub index: IndexId,
    /// Rows the range condition is expected to select
    pub rows: f64,
    /// Cost of an index-only scan over the range
    pub index_only_cost: f64,
}

/// Statistics the optimizer collected for a table (read-only)
pub trait TableStatistics {
    /// Estimated number of rows in the table
    fn row_count(&self) -> f64;

    /// Length in bytes of the storage engine's row locator
    fn ref_length(&self) -> usize;

    /// Estimates for every index with a usable range condition
    fn range_estimates(&self) -> Vec<RangeEstimate>;

    /// Indexes whose ranges intersect the range of `index`
    fn intersected_with(&self, _index: IndexId) -> IndexSet {
        IndexSet::new()
    }
}

/// Plain statistics record, loadable from JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticTableStats {
    /// Table name (diagnostics only)
    #[serde(default)]
    pub table: String,
    pub rows: f64,
    pub ref_length: usize,
    #[serde(default)]
    pub ranges: Vec<RangeEstimate>,
    /// Per-index "intersected with" relation
    #[serde(default)]
    pub intersections: Vec<(IndexId, Vec<IndexId>)>,
}

impl TableStatistics for StaticTableStats {
    fn row_count(&self) -> f64 {
        self.rows
    }

    fn ref_length(&self) -> usize {
        self.ref_length
    }

    fn range_estimates(&self) -> Vec<RangeEstimate> {
        self.ranges.clone()
    }

    fn intersected_with(&self, index: IndexId) -> IndexSet {
        self.intersections
            .iter()
            .filter(|(k, _)| *k == index)
            .flat_map(|(_, with)| with.iter().copied())
            .collect()
    }
}

/// Builds the unorganized candidate set of a table
pub struct CandidateGatherer<'a> {
    session: &'a SessionConfig,
    container: ContainerKind,
}

impl<'a> CandidateGatherer<'a> {
    pub fn new(session: &'a SessionConfig) -> Self {
        Self {
            session,
            container: ContainerKind::SortedArray,
        }
    }

    /// Use another container kind for the cost model
    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    /// Indexes whose range fits the filter budget, in index order
    fn usable_ranges<S: TableStatistics>(&self, stats: &S) -> Vec<RangeEstimate> {
        let max_rows = self.session.max_filter_rows(stats.ref_length()) as f64;
        let mut usable: Vec<RangeEstimate> = stats
            .range_estimates()
            .into_iter()
            .filter(|r| r.rows <= max_rows)
            .collect();
        usable.sort_by_key(|r| r.index);
        usable.dedup_by_key(|r| r.index);
        usable
    }

    /// Computes one candidate per usable index.
    ///
    /// Returns `None` when rowid filters are disabled or no index qualifies.
    pub fn build<S: TableStatistics>(&self, stats: &S) -> OptimizerResult<Option<CandidateSet>> {
        if !self.session.rowid_filter {
            return Ok(None);
        }
        if !stats.row_count().is_finite() || stats.row_count() < 0.0 {
            return Err(OptimizerError::InvalidStatistics(format!(
                "table row count {}",
                stats.row_count()
            )));
        }

        let usable = self.usable_ranges(stats);
        if usable.is_empty() {
            return Ok(None);
        }

        let mut candidates: Vec<FilterCandidate> = Vec::new();
        candidates
            .try_reserve_exact(usable.len())
            .map_err(|_| OptimizerError::AllocationFailure {
                requested: usable.len(),
            })?;

        let model = CostModel::new(stats.row_count());
        for range in &usable {
            if !(range.rows >= 0.0 && range.index_only_cost >= 0.0) {
                return Err(OptimizerError::InvalidStatistics(format!(
                    "index {}: rows {}, cost {}",
                    range.index, range.rows, range.index_only_cost
                )));
            }
            let candidate =
                model.candidate(range.index, self.container, range.rows, range.index_only_cost)?;
            Logger::trace(
                "ROWID_FILTER_CANDIDATE",
                &[
                    ("index", &candidate.index().to_string()),
                    ("build_cost", &candidate.build_cost().to_string()),
                    ("slope", &candidate.slope().to_string()),
                    ("break_even", &candidate.break_even().to_string()),
                ],
            );
            candidates.push(candidate);
        }

        Ok(Some(CandidateSet::new(candidates)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(ranges: Vec<(u32, f64, f64)>) -> StaticTableStats {
        StaticTableStats {
            table: "t1".into(),
            rows: 100_000.0,
            ref_length: 8,
            ranges: ranges
                .into_iter()
                .map(|(i, rows, cost)| RangeEstimate {
                    index: IndexId(i),
                    rows,
                    index_only_cost: cost,
                })
                .collect(),
            intersections: Vec::new(),
        }
    }

    #[test]
    fn test_one_candidate_per_index() {
        let session = SessionConfig::default();
        let set = CandidateGatherer::new(&session)
            .build(&stats(vec![(2, 500.0, 5.0), (1, 1000.0, 9.0)]))
            .unwrap()
            .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set[0].index(), IndexId(1));
        assert_eq!(set[1].index(), IndexId(2));
        assert_eq!(set.best_count(), 0);
    }

    #[test]
    fn test_budget_cap_excludes_large_ranges() {
        // 4096 bytes / 8 byte locators = 512 rows
        let session = SessionConfig {
            max_rowid_filter_size: 4096,
            ..Default::default()
        };
        let set = CandidateGatherer::new(&session)
            .build(&stats(vec![(0, 512.0, 1.0), (1, 513.0, 1.0)]))
            .unwrap()
            .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set[0].index(), IndexId(0));
    }

    #[test]
    fn test_no_usable_index() {
        let session = SessionConfig::default();
        let result = CandidateGatherer::new(&session)
            .build(&stats(vec![(0, 1e9, 1.0)]))
            .unwrap();
        assert!(result.is_none());

        let result = CandidateGatherer::new(&session).build(&stats(vec![])).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_disabled_session() {
        let session = SessionConfig {
            rowid_filter: false,
            ..Default::default()
        };
        let result = CandidateGatherer::new(&session)
            .build(&stats(vec![(0, 10.0, 1.0)]))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unsupported_container() {
        let session = SessionConfig::default();
        let err = CandidateGatherer::new(&session)
            .with_container(ContainerKind::BloomFilter)
            .build(&stats(vec![(0, 10.0, 1.0)]))
            .unwrap_err();
        assert_eq!(err.code(), "ROWID_FILTER_UNSUPPORTED_CONTAINER");
    }

    #[test]
    fn test_invalid_statistics() {
        let session = SessionConfig::default();
        let err = CandidateGatherer::new(&session)
            .build(&stats(vec![(0, f64::NAN, 1.0)]))
            .err();
        // NaN rows never pass the budget filter
        assert!(err.is_none());

        let err = CandidateGatherer::new(&session)
            .build(&stats(vec![(0, 10.0, -1.0)]))
            .unwrap_err();
        assert_eq!(err.code(), "ROWID_FILTER_INVALID_STATISTICS");
    }

    #[test]
    fn test_intersected_with() {
        let mut s = stats(vec![]);
        s.intersections = vec![(IndexId(1), vec![IndexId(2), IndexId(3)])];
        let with = s.intersected_with(IndexId(1));
        assert_eq!(with.len(), 2);
        assert!(s.intersected_with(IndexId(2)).is_empty());
    }

    #[test]
    fn test_stats_from_json() {
        let s: StaticTableStats = serde_json::from_str(
            r#"{"rows": 1000, "ref_length": 6,
                "ranges": [{"index": 1, "rows": 10, "index_only_cost": 1.5}]}"#,
        )
        .unwrap();
        assert_eq!(s.ranges[0].index, IndexId(1));
        assert_eq!(s.ref_length, 6);
    }
}
