//! Filter choice for one join order
//!
//! Invoked by the join order search for every partial plan that reaches the
//! table. `card = record_count_prefix * records_this_table` is the number of
//! probes a filter would serve in that plan.

use crate::observability::Logger;

use super::candidates::CandidateSet;
use super::cost::{FilterCandidate, IndexId, IndexSet};

/// Picks the rowid filter to apply at a join order position.
///
/// Never mutates the candidate set.
#[derive(Debug, Clone, Default)]
pub struct JoinOrderSelector {
    intersected_with: IndexSet,
}

impl JoinOrderSelector {
    /// Selector with an empty "intersected with" relation
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes whose ranges intersect the table's currently bound index;
    /// filters on them are never chosen from the ambiguous candidates.
    pub fn with_intersected(intersected_with: IndexSet) -> Self {
        Self { intersected_with }
    }

    /// Filter to use when `ref_key` drives direct access, or `None`.
    pub fn choose<'s>(
        &self,
        set: Option<&'s CandidateSet>,
        ref_key: Option<IndexId>,
        record_count_prefix: f64,
        records_this_table: f64,
    ) -> Option<&'s FilterCandidate> {
        let set = set?;
        let card = record_count_prefix * records_this_table;
        let chosen = self.choose_for_cardinality(set, ref_key, card);

        if let Some(filter) = chosen {
            Logger::trace(
                "ROWID_FILTER_CHOSEN",
                &[
                    ("index", &filter.index().to_string()),
                    ("cardinality", &card.to_string()),
                    ("gain", &filter.gain(card).to_string()),
                ],
            );
        }
        chosen
    }

    fn choose_for_cardinality<'s>(
        &self,
        set: &'s CandidateSet,
        ref_key: Option<IndexId>,
        card: f64,
    ) -> Option<&'s FilterCandidate> {
        let best = set.get(0)?;
        if card < best.break_even() {
            return None;
        }

        if set.best_count() > 0 {
            if Some(best.index()) != ref_key {
                return Some(best);
            }
            if set.best_count() == 2 {
                let second = &set[1];
                return (card >= second.break_even()).then_some(second);
            }
            return None;
        }

        let mut chosen: Option<&FilterCandidate> = None;
        let mut chosen_gain = 0.0;
        for filter in set.residual() {
            if Some(filter.index()) == ref_key || self.intersected_with.contains(&filter.index()) {
                continue;
            }
            if card < filter.break_even() {
                break;
            }
            let gain = filter.gain(card);
            if gain > chosen_gain {
                chosen_gain = gain;
                chosen = Some(filter);
            }
        }
        chosen
    }
}
