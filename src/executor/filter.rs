//! Range rowid filter
//!
//! Built once per statement for the candidate the optimizer chose: a range
//! scan over the candidate's index collects the locators of every row in
//! range, the locators are sorted, and the main access path probes the
//! result before fetching a row.
//!
//! # Fill protocol
//!
//! 1. Save and clear the handler state, enter keyread mode on the index
//! 2. `init`, `reset`, then `next_row` until `EndOfData`, polling the kill
//!    signal before every step
//! 3. `range_end` once the scan was started
//! 4. Leave keyread mode, restore the handler state
//!
//! Steps 3 and 4 run on success, scan error and cancellation alike.

use std::cell::Cell;
use std::sync::Arc;

use serde::Serialize;

use crate::observability::{MetricsRegistry, ObservationScope};
use crate::optimizer::{FilterCandidate, IndexId};

use super::container::{create_container, ContainerState, LocatorOrder, RowLocatorSet};
use super::errors::{ExecutorError, ExecutorResult};
use super::handler::{HandlerStateGuard, KillSignal, StorageHandle};
use super::scan::{RangeScan, ScanStep};

/// Counters of one runtime filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Locators collected by the fill
    pub collected: u64,
    /// `check` calls
    pub lookups: u64,
    /// `check` calls that found the locator
    pub hits: u64,
}

/// Rowid filter filled from a range scan
pub struct RangeRowidFilter<S, L, O> {
    index: IndexId,
    scan: S,
    container: RowLocatorSet<L, O>,
    lookups: Cell<u64>,
    hits: Cell<u64>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S, L, O> RangeRowidFilter<S, L, O>
where
    S: RangeScan,
    O: LocatorOrder<L>,
{
    /// Filter for `candidate`, filled by `scan` and ordered by `order`.
    ///
    /// The scan must run over the candidate's index.
    pub fn new(candidate: &FilterCandidate, scan: S, order: O) -> ExecutorResult<Self> {
        if scan.index() != candidate.index() {
            return Err(ExecutorError::ContractViolation(format!(
                "range scan on index {} cannot fill a filter on index {}",
                scan.index(),
                candidate.index()
            )));
        }
        let container = create_container(candidate, order)?;
        Ok(Self {
            index: candidate.index(),
            scan,
            container,
            lookups: Cell::new(0),
            hits: Cell::new(0),
            metrics: None,
        })
    }

    /// Filter ordered the way `handle`'s engine orders its locators
    pub fn for_handle<H>(candidate: &FilterCandidate, scan: S, handle: &H) -> ExecutorResult<Self>
    where
        H: StorageHandle<Locator = L, Order = O> + ?Sized,
    {
        Self::new(candidate, scan, handle.locator_order())
    }

    /// Record fill outcomes in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn index(&self) -> IndexId {
        self.index
    }

    pub fn state(&self) -> ContainerState {
        self.container.state()
    }

    /// Whether `check` may be called
    pub fn is_ready(&self) -> bool {
        self.container.state() == ContainerState::Sorted
    }

    /// Runs the range scan and collects the locator of every row in range.
    ///
    /// Returns the number of locators collected. On error the container is
    /// left empty and the handle exactly as it was found.
    pub fn fill<H, K>(&mut self, handle: &mut H, kill: &K) -> ExecutorResult<usize>
    where
        H: StorageHandle<Locator = L> + ?Sized,
        K: KillSignal + ?Sized,
    {
        if self.container.state() != ContainerState::Empty {
            return Err(ExecutorError::ContractViolation(
                "rowid filter filled twice".into(),
            ));
        }

        let index = self.index.to_string();
        let scope = ObservationScope::with_fields("ROWID_FILTER_FILL", &[("index", &index)]);

        let outcome = {
            let mut guard = HandlerStateGuard::enter(handle, self.index);
            self.collect(&mut *guard, kill)
        };

        match outcome {
            Ok(()) => {
                self.container.mark_filled();
                handle.set_rowid_filter_active();

                let collected = self.container.len();
                if let Some(metrics) = &self.metrics {
                    metrics.increment_filters_built();
                    metrics.add_locators_collected(collected as u64);
                }
                scope.complete_with_fields(&[("locators", &collected.to_string())]);
                Ok(collected)
            }
            Err(e) => {
                self.container.reset();
                if let Some(metrics) = &self.metrics {
                    if e.is_cancelled() {
                        metrics.increment_filter_builds_cancelled();
                    } else {
                        metrics.increment_filter_build_failures();
                    }
                }
                scope.fail(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    fn collect<H, K>(&mut self, handle: &mut H, kill: &K) -> ExecutorResult<()>
    where
        H: StorageHandle<Locator = L> + ?Sized,
        K: KillSignal + ?Sized,
    {
        let result = self.scan_range(handle, kill);
        self.scan.range_end();
        result
    }

    fn scan_range<H, K>(&mut self, handle: &mut H, kill: &K) -> ExecutorResult<()>
    where
        H: StorageHandle<Locator = L> + ?Sized,
        K: KillSignal + ?Sized,
    {
        let index = self.index;
        let failed = move |source| ExecutorError::ScanFailure { index, source };

        self.scan.init().map_err(failed)?;
        self.scan.reset().map_err(failed)?;
        loop {
            if kill.is_killed() {
                return Err(ExecutorError::Cancelled { index });
            }
            match self.scan.next_row().map_err(failed)? {
                ScanStep::Row => self.container.add(handle.position())?,
                ScanStep::EndOfData => return Ok(()),
            }
        }
    }

    /// Orders the collected locators
    pub fn sort(&mut self) -> ExecutorResult<()> {
        self.container.sort()
    }

    /// `fill` followed by `sort`
    pub fn build<H, K>(&mut self, handle: &mut H, kill: &K) -> ExecutorResult<usize>
    where
        H: StorageHandle<Locator = L> + ?Sized,
        K: KillSignal + ?Sized,
    {
        let collected = self.fill(handle, kill)?;
        self.sort()?;
        Ok(collected)
    }

    /// Whether the row at `locator` is in range.
    ///
    /// # Panics
    ///
    /// Panics if called before `sort`.
    pub fn check(&self, locator: &L) -> bool {
        let hit = self.container.check(locator);
        self.lookups.set(self.lookups.get() + 1);
        if hit {
            self.hits.set(self.hits.get() + 1);
        }
        hit
    }

    pub fn stats(&self) -> FilterStats {
        FilterStats {
            collected: self.container.len() as u64,
            lookups: self.lookups.get(),
            hits: self.hits.get(),
        }
    }
}
