//! Range scan interface consumed by the filter fill

use thiserror::Error;

use crate::optimizer::IndexId;

/// Storage engine error surfaced by a range scan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage engine error {code}: {message}")]
pub struct ScanError {
    /// Engine specific error number
    pub code: i32,
    pub message: String,
}

impl ScanError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Outcome of one scan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    /// A row was produced; its locator is readable from the storage handle
    Row,
    /// The range is exhausted
    EndOfData,
}

/// Quick range select executor over one index.
///
/// The scan is positioned on the table's storage handle: after a `Row`
/// step, the handle's current position is the locator of that row.
pub trait RangeScan {
    /// Index the range condition applies to
    fn index(&self) -> IndexId;

    /// Prepares the scan; called once before `reset`
    fn init(&mut self) -> Result<(), ScanError>;

    /// Positions the scan on the first range
    fn reset(&mut self) -> Result<(), ScanError>;

    /// Advances to the next row in range
    fn next_row(&mut self) -> Result<ScanStep, ScanError>;

    /// Releases scan resources; called on every exit path once started
    fn range_end(&mut self);
}

impl<S: RangeScan + ?Sized> RangeScan for Box<S> {
    fn index(&self) -> IndexId {
        (**self).index()
    }

    fn init(&mut self) -> Result<(), ScanError> {
        (**self).init()
    }

    fn reset(&mut self) -> Result<(), ScanError> {
        (**self).reset()
    }

    fn next_row(&mut self) -> Result<ScanStep, ScanError> {
        (**self).next_row()
    }

    fn range_end(&mut self) {
        (**self).range_end()
    }
}
