//! Runtime Filter Tests
//!
//! Tests for building and probing a range rowid filter:
//! - Probes answer exactly the collected locators
//! - Handler state is restored on success, scan error and cancellation
//! - The kill signal is honored between scan steps

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use rowfilter::executor::{
    ContainerState, HandlerState, KillSignal, PushedIndexCondition, RangeRowidFilter, RangeScan,
    ScanError, ScanStep, StorageHandle,
};
use rowfilter::observability::MetricsRegistry;
use rowfilter::optimizer::{FilterCandidate, IndexId};

// =============================================================================
// Helper Types
// =============================================================================

/// Byte-string locators, as a heap engine would hand out
type Locator = Vec<u8>;

/// In-memory table; the range scan positions it through `cursor`
struct Table {
    rows: Vec<Locator>,
    cursor: Arc<AtomicUsize>,
    state: HandlerState,
    keyread: Option<IndexId>,
    keyread_calls: usize,
    filter_active: bool,
}

fn by_bytes(a: &Locator, b: &Locator) -> Ordering {
    a.cmp(b)
}

impl StorageHandle for Table {
    type Locator = Locator;
    type Order = fn(&Locator, &Locator) -> Ordering;

    fn position(&self) -> Locator {
        self.rows[self.cursor.load(AtomicOrdering::SeqCst)].clone()
    }

    fn locator_order(&self) -> Self::Order {
        by_bytes
    }

    fn handler_state(&self) -> HandlerState {
        self.state
    }

    fn restore_handler_state(&mut self, state: HandlerState) {
        self.state = state;
    }

    fn start_keyread(&mut self, index: IndexId) {
        self.keyread = Some(index);
        self.keyread_calls += 1;
    }

    fn end_keyread(&mut self) {
        self.keyread = None;
    }

    fn set_rowid_filter_active(&mut self) {
        self.filter_active = true;
    }
}

/// Range scan over the table positions listed in `hits`
struct IndexRange {
    index: IndexId,
    hits: Vec<usize>,
    next: usize,
    cursor: Arc<AtomicUsize>,
    fail_after: Option<usize>,
    range_ended: Arc<AtomicBool>,
}

impl RangeScan for IndexRange {
    fn index(&self) -> IndexId {
        self.index
    }

    fn init(&mut self) -> Result<(), ScanError> {
        Ok(())
    }

    fn reset(&mut self) -> Result<(), ScanError> {
        self.next = 0;
        Ok(())
    }

    fn next_row(&mut self) -> Result<ScanStep, ScanError> {
        if self.fail_after == Some(self.next) {
            return Err(ScanError::new(1030, "got error from storage engine"));
        }
        match self.hits.get(self.next) {
            Some(pos) => {
                self.cursor.store(*pos, AtomicOrdering::SeqCst);
                self.next += 1;
                Ok(ScanStep::Row)
            }
            None => Ok(ScanStep::EndOfData),
        }
    }

    fn range_end(&mut self) {
        self.range_ended.store(true, AtomicOrdering::SeqCst);
    }
}

/// Kill signal that fires after a number of polls
struct KillAfter {
    polls: AtomicUsize,
    limit: usize,
}

impl KillSignal for KillAfter {
    fn is_killed(&self) -> bool {
        self.polls.fetch_add(1, AtomicOrdering::SeqCst) >= self.limit
    }
}

fn statement_state() -> HandlerState {
    HandlerState {
        table_status: 0x10,
        pushed_index_condition: Some(PushedIndexCondition {
            index: IndexId(1),
            condition_id: 42,
        }),
        in_range_check_pushed_down: true,
    }
}

struct Fixture {
    filter: RangeRowidFilter<IndexRange, Locator, fn(&Locator, &Locator) -> Ordering>,
    handle: Table,
    range_ended: Arc<AtomicBool>,
}

fn fixture(rows: &[&[u8]], hits: Vec<usize>, fail_after: Option<usize>) -> Fixture {
    let cursor = Arc::new(AtomicUsize::new(0));
    let range_ended = Arc::new(AtomicBool::new(false));
    let handle = Table {
        rows: rows.iter().map(|r| r.to_vec()).collect(),
        cursor: cursor.clone(),
        state: statement_state(),
        keyread: None,
        keyread_calls: 0,
        filter_active: false,
    };
    let scan = IndexRange {
        index: IndexId(3),
        hits,
        next: 0,
        cursor,
        fail_after,
        range_ended: range_ended.clone(),
    };
    let candidate = FilterCandidate::from_parts(IndexId(3), 3.0, 0.001, 12.0, 1.1);
    let filter = RangeRowidFilter::for_handle(&candidate, scan, &handle).unwrap();
    Fixture {
        filter,
        handle,
        range_ended,
    }
}

fn assert_restored(handle: &Table) {
    assert_eq!(handle.state, statement_state());
    assert_eq!(handle.keyread, None);
    assert_eq!(handle.keyread_calls, 1);
}

// =============================================================================
// Build And Probe
// =============================================================================

/// Locators {3, 1, 2} collected out of order; probes after sort.
#[test]
fn test_build_then_check() {
    let rows: &[&[u8]] = &[&[0], &[1], &[2], &[3], &[4], &[5]];
    let mut f = fixture(rows, vec![3, 1, 2], None);

    let collected = f.filter.build(&mut f.handle, &AtomicBool::new(false)).unwrap();

    assert_eq!(collected, 3);
    assert_eq!(f.filter.state(), ContainerState::Sorted);
    assert!(f.filter.check(&vec![2]));
    assert!(!f.filter.check(&vec![5]));
    assert!(f.filter.check(&vec![1]));
    assert!(f.filter.check(&vec![3]));
    assert!(f.range_ended.load(AtomicOrdering::SeqCst));
    assert!(f.handle.filter_active);
    assert_restored(&f.handle);
}

/// Repeated sorting never changes probe results.
#[test]
fn test_sort_idempotent() {
    let rows: &[&[u8]] = &[b"aa", b"ab", b"b", b"ba"];
    let mut f = fixture(rows, vec![3, 0, 2], None);
    f.filter.fill(&mut f.handle, &AtomicBool::new(false)).unwrap();
    f.filter.sort().unwrap();

    let before: Vec<bool> = rows.iter().map(|r| f.filter.check(&r.to_vec())).collect();
    f.filter.sort().unwrap();
    let after: Vec<bool> = rows.iter().map(|r| f.filter.check(&r.to_vec())).collect();

    assert_eq!(before, after);
    assert_eq!(before, vec![true, false, true, true]);
}

/// Probe counters track lookups and hits.
#[test]
fn test_stats() {
    let rows: &[&[u8]] = &[&[7], &[8], &[9]];
    let mut f = fixture(rows, vec![0, 2], None);
    f.filter.build(&mut f.handle, &AtomicBool::new(false)).unwrap();

    for probe in [7u8, 8, 9, 9] {
        f.filter.check(&vec![probe]);
    }
    let stats = f.filter.stats();
    assert_eq!(stats.collected, 2);
    assert_eq!(stats.lookups, 4);
    assert_eq!(stats.hits, 3);
}

// =============================================================================
// Failure Paths
// =============================================================================

/// A scan error leaves the filter unready and the handle untouched.
#[test]
fn test_scan_error() {
    let metrics = Arc::new(MetricsRegistry::new());
    let rows: &[&[u8]] = &[&[0], &[1], &[2]];
    let mut f = fixture(rows, vec![0, 1, 2], Some(2));
    let mut filter = f.filter.with_metrics(metrics.clone());

    let err = filter.build(&mut f.handle, &AtomicBool::new(false)).unwrap_err();

    assert_eq!(err.code(), "ROWID_FILTER_SCAN_FAILED");
    assert_eq!(filter.state(), ContainerState::Empty);
    assert!(f.range_ended.load(AtomicOrdering::SeqCst));
    assert!(!f.handle.filter_active);
    assert_restored(&f.handle);
    assert_eq!(metrics.snapshot().filter_build_failures, 1);
}

/// Cancellation mid-scan behaves like a scan error.
#[test]
fn test_cancel_mid_scan() {
    let metrics = Arc::new(MetricsRegistry::new());
    let rows: &[&[u8]] = &[&[0], &[1], &[2], &[3]];
    let mut f = fixture(rows, vec![0, 1, 2, 3], None);
    let mut filter = f.filter.with_metrics(metrics.clone());
    let kill = KillAfter {
        polls: AtomicUsize::new(0),
        limit: 2,
    };

    let err = filter.build(&mut f.handle, &kill).unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(err.code(), "ROWID_FILTER_CANCELLED");
    assert!(!filter.is_ready());
    assert_eq!(filter.stats().collected, 0);
    assert!(f.range_ended.load(AtomicOrdering::SeqCst));
    assert_restored(&f.handle);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.filter_builds_cancelled, 1);
    assert_eq!(snapshot.filters_built, 0);
}

/// A shared flag set before the fill cancels it before the first row.
#[test]
fn test_cancel_before_first_row() {
    let rows: &[&[u8]] = &[&[0]];
    let mut f = fixture(rows, vec![0], None);
    let kill = Arc::new(AtomicBool::new(true));

    let err = f.filter.fill(&mut f.handle, &kill).unwrap_err();
    assert!(err.is_cancelled());
    assert_restored(&f.handle);
}

/// Probing an unsorted filter is a caller bug.
#[test]
#[should_panic(expected = "probed before sort")]
fn test_check_before_sort() {
    let rows: &[&[u8]] = &[&[0]];
    let mut f = fixture(rows, vec![0], None);
    f.filter.fill(&mut f.handle, &AtomicBool::new(false)).unwrap();
    f.filter.check(&vec![0]);
}
