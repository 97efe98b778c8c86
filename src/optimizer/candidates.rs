//! Per-table set of filter candidates
//!
//! After organizing, the first `best_count` entries are the unconditioned
//! best filters and the rest are ordered by ascending break-even
//! cardinality.

use std::ops::Index;

use super::cost::{FilterCandidate, IndexId};

/// Candidates of one table for one statement's optimization pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    pub(super) candidates: Vec<FilterCandidate>,
    pub(super) best_count: usize,
}

impl CandidateSet {
    /// Wraps candidates that have not been organized yet
    pub fn new(candidates: Vec<FilterCandidate>) -> Self {
        Self {
            candidates,
            best_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of unconditioned best filters at the front (0, 1 or 2)
    pub fn best_count(&self) -> usize {
        self.best_count
    }

    pub fn get(&self, i: usize) -> Option<&FilterCandidate> {
        self.candidates.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterCandidate> {
        self.candidates.iter()
    }

    pub fn as_slice(&self) -> &[FilterCandidate] {
        &self.candidates
    }

    /// Unconditioned best filters, steepest slope first
    pub fn best(&self) -> &[FilterCandidate] {
        &self.candidates[..self.best_count]
    }

    /// Remaining candidates in break-even order
    pub fn residual(&self) -> &[FilterCandidate] {
        &self.candidates[self.best_count..]
    }

    /// Candidate built on `index`, if any
    pub fn find(&self, index: IndexId) -> Option<&FilterCandidate> {
        self.candidates.iter().find(|c| c.index() == index)
    }
}

impl Index<usize> for CandidateSet {
    type Output = FilterCandidate;

    fn index(&self, i: usize) -> &FilterCandidate {
        &self.candidates[i]
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a FilterCandidate;
    type IntoIter = std::slice::Iter<'a, FilterCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
