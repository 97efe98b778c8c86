//! Observability for rowid filter planning and execution
//!
//! - Structured logging (one JSON object per line)
//! - Monotonic counters
//! - Begin/complete scopes around filter builds
//!
//! Observability is read-only: nothing here influences which filter is
//! chosen or how it is built.
//!
//! ```ignore
//! use rowfilter::observability::{Logger, MetricsRegistry, ObservationScope};
//!
//! Logger::info("ROWID_FILTER_CANDIDATES_GATHERED", &[("table", "t1"), ("count", "3")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_tables_planned();
//!
//! let scope = ObservationScope::new("ROWID_FILTER_FILL");
//! scope.complete();
//! ```

mod logger;
mod metrics;
mod scope;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;
