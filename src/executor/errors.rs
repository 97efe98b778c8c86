//! Executor error types
//!
//! Error codes:
//! - ROWID_FILTER_SCAN_FAILED (ERROR)
//! - ROWID_FILTER_CANCELLED (ERROR)
//! - ROWID_FILTER_CONTRACT_VIOLATION (FATAL)
//!
//! A failed or cancelled fill leaves the filter unready; the statement runs
//! without it or is aborted by its caller.

use std::fmt;

use thiserror::Error;

use crate::optimizer::IndexId;

use super::scan::ScanError;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The filter is unusable, the system is healthy
    Error,
    /// Caller bug
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Errors raised while building a rowid filter
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The range scan reported a storage engine error
    #[error("Range scan on index {index} failed: {source}")]
    ScanFailure {
        index: IndexId,
        #[source]
        source: ScanError,
    },

    /// The kill signal was observed during the fill
    #[error("Rowid filter fill on index {index} cancelled")]
    Cancelled { index: IndexId },

    /// Operation invoked in the wrong state or with unsupported input
    #[error("Rowid filter contract violation: {0}")]
    ContractViolation(String),
}

impl ExecutorError {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorError::ScanFailure { .. } => "ROWID_FILTER_SCAN_FAILED",
            ExecutorError::Cancelled { .. } => "ROWID_FILTER_CANCELLED",
            ExecutorError::ContractViolation(_) => "ROWID_FILTER_CONTRACT_VIOLATION",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorError::ContractViolation(_) => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutorError::Cancelled { .. })
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
