//! `SnapshotObserver<W>`: bridges `DispatchObserver` to an `OutputWriter`.

use std::collections::HashSet;

use pd_core::Tick;
use pd_sim::{DispatchObserver, DispatchView, TickReport};

use crate::row::{ParcelStatusRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{JsonSnapshotWriter, OutputError, OutputResult, Snapshot};

/// A [`DispatchObserver`] that records every live-loop tick.
///
/// Each tick writes one summary row plus one status row for every parcel
/// that changed state or is still moving.  With
/// [`with_snapshots`](Self::with_snapshots) it also writes a full JSON
/// snapshot every `every_ticks` ticks.
///
/// Errors are stored internally because observer methods have no return
/// value.  After the loop returns, check with [`take_error`](Self::take_error).
pub struct SnapshotObserver<W: OutputWriter> {
    writer:     W,
    snapshots:  Option<(JsonSnapshotWriter, u64)>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SnapshotObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, snapshots: None, last_error: None }
    }

    /// Also write a JSON snapshot whenever the tick is a multiple of
    /// `every_ticks` (0 disables).
    pub fn with_snapshots(mut self, json: JsonSnapshotWriter, every_ticks: u64) -> Self {
        self.snapshots = (every_ticks > 0).then_some((json, every_ticks));
        self
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> DispatchObserver for SnapshotObserver<W> {
    fn on_tick(&mut self, report: &TickReport, view: &DispatchView<'_>) {
        let summary = TickSummaryRow {
            tick:        report.tick.0,
            transitions: report.transitions.len() as u64,
            active:      report.active as u64,
            pending:     view.pending().len() as u64,
        };
        let result = self.writer.write_tick_summary(&summary);
        self.store_err(result);

        let changed: HashSet<&str> = report.transitions.iter().map(|c| c.parcel_id.as_str()).collect();
        let rows: Vec<ParcelStatusRow> = view
            .parcels
            .iter()
            .filter(|p| changed.contains(p.id()) || p.status().is_active())
            .map(|p| ParcelStatusRow::observe(p, report.tick))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_parcel_rows(&rows);
            self.store_err(result);
        }

        if let Some((json, every)) = &self.snapshots
            && report.tick.0 % every == 0
        {
            let result = json.write(&Snapshot::capture(view));
            self.store_err(result);
        }
    }

    fn on_live_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
