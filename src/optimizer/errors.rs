//! Optimizer error types
//!
//! Error codes:
//! - ROWID_FILTER_ALLOCATION_FAILED (ERROR)
//! - ROWID_FILTER_UNSUPPORTED_CONTAINER (FATAL)
//! - ROWID_FILTER_INVALID_STATISTICS (ERROR)
//!
//! None of these fail the statement: the optimizer proceeds without rowid
//! filters for the affected table.

use std::fmt;

use thiserror::Error;

use super::cost::ContainerKind;

/// Severity levels for optimizer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Filter selection abandoned for one table
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

/// Errors raised while gathering and organizing filter candidates
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizerError {
    /// Candidate storage could not be reserved
    #[error("Cannot reserve storage for {requested} rowid filter candidates")]
    AllocationFailure { requested: usize },

    /// Only sorted-array containers have a cost model
    #[error("Unsupported rowid filter container: {0}")]
    UnsupportedContainer(ContainerKind),

    /// Statistics that make the cost model meaningless
    #[error("Invalid statistics: {0}")]
    InvalidStatistics(String),
}

impl OptimizerError {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            OptimizerError::AllocationFailure { .. } => "ROWID_FILTER_ALLOCATION_FAILED",
            OptimizerError::UnsupportedContainer(_) => "ROWID_FILTER_UNSUPPORTED_CONTAINER",
            OptimizerError::InvalidStatistics(_) => "ROWID_FILTER_INVALID_STATISTICS",
        }
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        match self {
            OptimizerError::UnsupportedContainer(_) => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

/// Result type for optimizer operations
pub type OptimizerResult<T> = Result<T, OptimizerError>;
