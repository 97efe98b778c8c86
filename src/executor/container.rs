//! Sorted-array container of row locators
//!
//! Grows while the fill collects locators, is sorted once, then answers
//! membership probes by binary search.
//!
//! ```text
//! Empty --mark_filled--> Filled --sort--> Sorted
//! ```

use std::cmp::Ordering;

use crate::optimizer::{ContainerKind, FilterCandidate};

use super::errors::{ExecutorError, ExecutorResult};

/// Total order over row locators
pub trait LocatorOrder<L: ?Sized> {
    fn compare(&self, a: &L, b: &L) -> Ordering;
}

impl<L: ?Sized, F> LocatorOrder<L> for F
where
    F: Fn(&L, &L) -> Ordering,
{
    fn compare(&self, a: &L, b: &L) -> Ordering {
        self(a, b)
    }
}

/// `Ord` order of the locator type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<L: Ord + ?Sized> LocatorOrder<L> for NaturalOrder {
    fn compare(&self, a: &L, b: &L) -> Ordering {
        a.cmp(b)
    }
}

/// Lifecycle of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// Collecting locators
    Empty,
    /// All locators collected, not yet sorted
    Filled,
    /// Ready for lookups
    Sorted,
}

/// Dynamically grown array of row locators
#[derive(Debug, Clone)]
pub struct RowLocatorSet<L, O> {
    locators: Vec<L>,
    order: O,
    state: ContainerState,
}

impl<L, O: LocatorOrder<L>> RowLocatorSet<L, O> {
    pub fn with_capacity(order: O, capacity: usize) -> Self {
        Self {
            locators: Vec::with_capacity(capacity),
            order,
            state: ContainerState::Empty,
        }
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.locators.capacity()
    }

    /// Appends a locator collected by the fill
    pub fn add(&mut self, locator: L) -> ExecutorResult<()> {
        if self.state != ContainerState::Empty {
            return Err(ExecutorError::ContractViolation(
                "locator added after the fill completed".into(),
            ));
        }
        self.locators.push(locator);
        Ok(())
    }

    /// Discards collected locators of an aborted fill
    pub fn reset(&mut self) {
        self.locators.clear();
        self.state = ContainerState::Empty;
    }

    pub(crate) fn mark_filled(&mut self) {
        self.state = ContainerState::Filled;
    }

    /// Orders the locators; sorting a sorted container is a no-op
    pub fn sort(&mut self) -> ExecutorResult<()> {
        match self.state {
            ContainerState::Empty => Err(ExecutorError::ContractViolation(
                "sort called before the container was filled".into(),
            )),
            ContainerState::Sorted => Ok(()),
            ContainerState::Filled => {
                let order = &self.order;
                self.locators.sort_unstable_by(|a, b| order.compare(a, b));
                self.state = ContainerState::Sorted;
                Ok(())
            }
        }
    }

    /// Whether a locator equal to `locator` was collected.
    ///
    /// # Panics
    ///
    /// Panics if the container is not sorted.
    pub fn check(&self, locator: &L) -> bool {
        assert!(
            self.state == ContainerState::Sorted,
            "rowid filter probed before sort"
        );
        let order = &self.order;
        self.locators
            .binary_search_by(|probe| order.compare(probe, locator))
            .is_ok()
    }
}

/// Creates the container a candidate's cost model was computed for.
///
/// Capacity is reserved for the candidate's expected row count.
pub fn create_container<L, O: LocatorOrder<L>>(
    candidate: &FilterCandidate,
    order: O,
) -> ExecutorResult<RowLocatorSet<L, O>> {
    match candidate.container() {
        ContainerKind::SortedArray => {
            let expected = candidate.est_elements();
            let capacity = if expected.is_finite() && expected > 0.0 {
                expected.ceil() as usize
            } else {
                0
            };
            Ok(RowLocatorSet::with_capacity(order, capacity))
        }
        kind => Err(ExecutorError::ContractViolation(format!(
            "no container implementation for {}",
            kind
        ))),
    }
}
