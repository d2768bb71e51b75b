//! The `OutputWriter` trait implemented by all status writers.

use crate::{OutputResult, ParcelStatusRow, TickSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are returned to the caller; [`SnapshotObserver`](crate::SnapshotObserver)
/// keeps the first one for [`take_error`](crate::SnapshotObserver::take_error).
pub trait OutputWriter {
    /// Write a batch of parcel observations.
    fn write_parcel_rows(&mut self, rows: &[ParcelStatusRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
