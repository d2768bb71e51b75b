//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `parcel_status.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, ParcelStatusRow, TickSummaryRow};

/// Writes parcel observations and tick summaries to two CSV files.
pub struct CsvWriter {
    parcels:   Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut parcels = Writer::from_path(dir.join("parcel_status.csv"))?;
        parcels.write_record(["tick", "parcel_id", "status", "agent", "delivery_attempts", "eta_remaining"])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "transitions", "active", "pending"])?;

        Ok(Self {
            parcels,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_parcel_rows(&mut self, rows: &[ParcelStatusRow]) -> OutputResult<()> {
        for row in rows {
            self.parcels.write_record(&[
                row.tick.to_string(),
                row.parcel_id.clone(),
                row.status.clone(),
                row.agent.clone(),
                row.delivery_attempts.to_string(),
                row.eta_remaining.map(|s| s.to_string()).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.transitions.to_string(),
            row.active.to_string(),
            row.pending.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.parcels.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
