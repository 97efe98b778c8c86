//! Cost model of a range rowid filter
//!
//! A filter built from index `k` is modeled as a linear gain function of the
//! number of probes `N` made against it:
//!
//! ```text
//! gain(N) = a * N - b
//! ```
//!
//! `b` is the one-time cost of building the filter (index-only range scan,
//! writing locators into the container, sorting them) and `a` is the net
//! saving per probe (rows rejected times the cost of fetching and evaluating
//! them, minus the lookup itself). The filter pays off once `N` exceeds the
//! break-even cardinality `x0 = b / a`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{OptimizerError, OptimizerResult};

/// Cost to write one row locator into a sorted array
pub const ARRAY_WRITE_COST: f64 = 0.005;
/// Factor of the `n * ln(n)` sort cost of a sorted array
pub const ARRAY_SORT_COST: f64 = 0.01;
/// Factor of the `ln(n)` binary search cost of a sorted array
pub const ARRAY_LOOKUP_COST: f64 = 0.01;
/// Cost to evaluate the pushed condition on a fetched row
pub const COND_EVAL_COST: f64 = 0.2;
/// Row comparisons per unit of cost
pub const TIME_FOR_COMPARE: f64 = 5.0;

/// Number of an index within its table
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IndexId(pub u32);

impl fmt::Display for IndexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered set of index numbers
pub type IndexSet = BTreeSet<IndexId>;

/// Search structure holding the filter's row locators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    /// Sorted array probed by binary search
    SortedArray,
    /// Bloom filter (no cost model, never built)
    BloomFilter,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::SortedArray => "SORTED_ARRAY",
            ContainerKind::BloomFilter => "BLOOM_FILTER",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Natural log of an element count, zero for counts below one
fn ln_count(n: f64) -> f64 {
    if n > 1.0 {
        n.ln()
    } else {
        0.0
    }
}

/// Point where two gain lines cross
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIntersection {
    /// Probe count at the crossing
    pub cardinality: f64,
    /// Gain of both filters at that probe count
    pub gain: f64,
}

impl LineIntersection {
    /// Whether the lines cross where both cardinality and gain are positive
    pub fn in_profitable_quadrant(&self) -> bool {
        self.cardinality > 0.0 && self.gain > 0.0
    }
}

/// Cost/benefit model of one candidate index.
///
/// Immutable once computed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCandidate {
    index: IndexId,
    container: ContainerKind,
    est_elements: f64,
    selectivity: f64,
    build_cost: f64,
    slope: f64,
    break_even: f64,
}

impl FilterCandidate {
    /// Creates a candidate from an already known gain line.
    ///
    /// The break-even cardinality is derived; it is infinite when the slope
    /// is not positive.
    pub fn from_parts(
        index: IndexId,
        est_elements: f64,
        selectivity: f64,
        build_cost: f64,
        slope: f64,
    ) -> Self {
        let break_even = if slope > 0.0 {
            build_cost / slope
        } else {
            f64::INFINITY
        };
        Self {
            index,
            container: ContainerKind::SortedArray,
            est_elements,
            selectivity,
            build_cost,
            slope,
            break_even,
        }
    }

    /// Same gain line, held in another container kind
    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }

    pub fn index(&self) -> IndexId {
        self.index
    }

    pub fn container(&self) -> ContainerKind {
        self.container
    }

    /// Rows the range condition on this index is expected to select
    pub fn est_elements(&self) -> f64 {
        self.est_elements
    }

    pub fn selectivity(&self) -> f64 {
        self.selectivity
    }

    /// Intercept `b` of the gain line
    pub fn build_cost(&self) -> f64 {
        self.build_cost
    }

    /// Slope `a` of the gain line
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// `x0 = b / a`
    pub fn break_even(&self) -> f64 {
        self.break_even
    }

    pub fn is_profitable(&self) -> bool {
        self.slope > 0.0
    }

    /// Gain promised for `rows` probes
    pub fn gain(&self, rows: f64) -> f64 {
        rows * self.slope - self.build_cost
    }

    /// Gain when the access method already caps its seeks at `worst_seeks`:
    /// probes past the cap save only condition evaluation, not a fetch.
    pub fn adjusted_gain(&self, rows: f64, worst_seeks: f64) -> f64 {
        self.gain(rows) - (1.0 - self.selectivity) * (rows - rows.min(worst_seeks))
    }

    /// Gain in comparison units when only condition evaluation is saved
    pub fn cmp_gain(&self, rows: f64) -> f64 {
        rows * (1.0 - self.selectivity) / TIME_FOR_COMPARE
    }

    /// Intersection of this candidate's gain line with `other`'s.
    ///
    /// Parallel lines never intersect.
    pub fn intersection(&self, other: &FilterCandidate) -> Option<LineIntersection> {
        if self.slope == other.slope {
            return None;
        }
        let cardinality = (self.build_cost - other.build_cost) / (self.slope - other.slope);
        Some(LineIntersection {
            cardinality,
            gain: self.gain(cardinality),
        })
    }
}

/// Computes filter candidates for the indexes of one table
#[derive(Debug, Clone, Copy)]
pub struct CostModel {
    table_rows: f64,
}

impl CostModel {
    /// Model for a table holding `table_rows` rows
    pub fn new(table_rows: f64) -> Self {
        Self { table_rows }
    }

    /// Cost of building a filter of `est_elements` locators whose range scan
    /// costs `index_only_cost`.
    pub fn build_cost(
        &self,
        container: ContainerKind,
        est_elements: f64,
        index_only_cost: f64,
    ) -> OptimizerResult<f64> {
        match container {
            ContainerKind::SortedArray => Ok(index_only_cost
                + ARRAY_WRITE_COST * est_elements
                + ARRAY_SORT_COST * est_elements * ln_count(est_elements)),
            other => Err(OptimizerError::UnsupportedContainer(other)),
        }
    }

    /// Cost of one membership probe
    pub fn lookup_cost(&self, container: ContainerKind, est_elements: f64) -> OptimizerResult<f64> {
        match container {
            ContainerKind::SortedArray => Ok(ARRAY_LOOKUP_COST * ln_count(est_elements)),
            other => Err(OptimizerError::UnsupportedContainer(other)),
        }
    }

    /// Fraction of the table selected by the range condition, in `[0, 1]`.
    ///
    /// An empty table selects everything, so no filter on it is profitable.
    pub fn selectivity(&self, est_elements: f64) -> f64 {
        if self.table_rows <= 0.0 {
            return 1.0;
        }
        (est_elements / self.table_rows).clamp(0.0, 1.0)
    }

    /// Builds the candidate for `index`
    pub fn candidate(
        &self,
        index: IndexId,
        container: ContainerKind,
        est_elements: f64,
        index_only_cost: f64,
    ) -> OptimizerResult<FilterCandidate> {
        let build_cost = self.build_cost(container, est_elements, index_only_cost)?;
        let selectivity = self.selectivity(est_elements);
        let slope = (1.0 + COND_EVAL_COST) * (1.0 - selectivity)
            - self.lookup_cost(container, est_elements)?;

        Ok(
            FilterCandidate::from_parts(index, est_elements, selectivity, build_cost, slope)
                .with_container(container),
        )
    }
}
