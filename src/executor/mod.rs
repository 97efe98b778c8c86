//! Runtime rowid filters
//!
//! Once the optimizer has chosen a filter for a table, the executor builds
//! it before the table's main access path starts reading:
//!
//! 1. `RangeRowidFilter::new` creates the container for the candidate
//! 2. `fill` runs the range scan and collects row locators
//! 3. `sort` orders them with the engine's locator order
//! 4. `check` answers membership probes during the main scan
//!
//! # Invariants
//!
//! - No partial filter is ever probed: `check` requires a sorted container
//! - The storage handle is left as found on every fill exit path

mod container;
mod errors;
mod filter;
mod handler;
mod scan;

pub use container::{create_container, ContainerState, LocatorOrder, NaturalOrder, RowLocatorSet};
pub use errors::{ExecutorError, ExecutorResult, Severity};
pub use filter::{FilterStats, RangeRowidFilter};
pub use handler::{
    HandlerState, HandlerStateGuard, KillSignal, PushedIndexCondition, StorageHandle,
};
pub use scan::{RangeScan, ScanError, ScanStep};
