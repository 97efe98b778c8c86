//! Pruning and ordering of filter candidates
//!
//! Each candidate is a gain line `a * N - b`. Two candidates whose lines
//! cross at a positive cardinality with positive gain are ambiguous: which
//! one is better depends on the cardinality of the join order being
//! evaluated. A candidate that crosses no other line in that quadrant either
//! dominates or is dominated by every other one, so candidates of that kind
//! can be ranked by slope alone.
//!
//! Organizing a set:
//! 1. Drop candidates with `a <= 0`
//! 2. Mark ambiguous candidates (pairwise line intersection)
//! 3. Move the two steepest non-ambiguous candidates to the front
//! 4. Sort the rest by ascending break-even cardinality

use crate::observability::Logger;

use super::candidates::CandidateSet;
use super::cost::{FilterCandidate, IndexSet};

/// What organizing a candidate set did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneSummary {
    /// Candidates removed for non-positive slope
    pub dropped: usize,
    /// Candidates marked ambiguous
    pub ambiguous: usize,
    /// Unconditioned best filters placed at the front
    pub best: usize,
}

/// Indexes of candidates whose gain lines cross some other candidate's line
/// in the quadrant where both cardinality and gain are positive.
pub fn ambiguous_indexes(candidates: &[FilterCandidate]) -> IndexSet {
    let mut ambiguous = IndexSet::new();
    for (i, filter) in candidates.iter().enumerate() {
        for other in &candidates[i + 1..] {
            let crosses = filter
                .intersection(other)
                .map_or(false, |p| p.in_profitable_quadrant());
            if crosses {
                ambiguous.insert(filter.index());
                ambiguous.insert(other.index());
            }
        }
    }
    ambiguous
}

/// Positions of the two steepest candidates not in `ambiguous`.
///
/// On equal slopes the candidate met first wins.
fn steepest_two(candidates: &[FilterCandidate], ambiguous: &IndexSet) -> [Option<usize>; 2] {
    let mut top: [Option<usize>; 2] = [None, None];
    for (pos, filter) in candidates.iter().enumerate() {
        if ambiguous.contains(&filter.index()) {
            continue;
        }
        match top {
            [None, _] => top[0] = Some(pos),
            [Some(first), second] => {
                if filter.slope() > candidates[first].slope() {
                    top = [Some(pos), Some(first)];
                } else if second.map_or(true, |s| filter.slope() > candidates[s].slope()) {
                    top[1] = Some(pos);
                }
            }
        }
    }
    top
}

/// Organizes candidate sets in place
pub struct Pruner;

impl Pruner {
    /// Reorders `set` so that up to two unconditioned best filters lead and
    /// the remaining ones follow in ascending break-even order.
    pub fn organize(set: &mut CandidateSet) -> PruneSummary {
        let before = set.candidates.len();
        set.candidates.retain(|filter| {
            if filter.is_profitable() {
                return true;
            }
            Logger::trace(
                "ROWID_FILTER_CANDIDATE_DROPPED",
                &[
                    ("index", &filter.index().to_string()),
                    ("slope", &filter.slope().to_string()),
                ],
            );
            false
        });
        let dropped = before - set.candidates.len();

        let ambiguous = ambiguous_indexes(&set.candidates);
        let top = steepest_two(&set.candidates, &ambiguous);

        let mut best_count = 0;
        if let Some(first) = top[0] {
            set.candidates.swap(0, first);
            best_count = 1;
            if let Some(mut second) = top[1] {
                // the swap above moved whatever sat in slot 0 to `first`
                if second == 0 {
                    second = first;
                }
                set.candidates.swap(1, second);
                best_count = 2;
            }
        }
        set.best_count = best_count;

        set.candidates[best_count..]
            .sort_by(|x, y| x.break_even().total_cmp(&y.break_even()));

        PruneSummary {
            dropped,
            ambiguous: ambiguous.len(),
            best: best_count,
        }
    }
}
