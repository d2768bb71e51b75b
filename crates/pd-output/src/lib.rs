//! `pd-output` — persistence and status export for the parcel dispatch engine.
//!
//! | Item                   | Purpose                                                     |
//! |------------------------|-------------------------------------------------------------|
//! | [`Snapshot`]           | full engine state; `capture(view)` / `restore(config, rng)` |
//! | [`JsonSnapshotWriter`] | writes and reads `Snapshot` files with `serde_json`         |
//! | [`CsvWriter`]          | `parcel_status.csv`, `tick_summaries.csv`                   |
//! | `SqliteWriter`         | same rows in `output.db` (feature `sqlite`)                 |
//! | [`SnapshotObserver`]   | `DispatchObserver` driving any [`OutputWriter`]             |
//!
//! # Usage
//!
//! ```rust,ignore
//! use pd_output::{CsvWriter, JsonSnapshotWriter, SnapshotObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SnapshotObserver::new(writer)
//!     .with_snapshots(JsonSnapshotWriter::new("./output/snapshot.json"), 60);
//! run_live(&mut coord, &cancel, &mut obs, Some(600))?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```
//!
//! The undo log is not part of a snapshot: a restored coordinator starts
//! with nothing to undo.

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod snapshot;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::JsonSnapshotWriter;
pub use observer::SnapshotObserver;
pub use row::{ParcelStatusRow, TickSummaryRow};
pub use snapshot::{AgentRecord, CityRecord, RoadRecord, Snapshot};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
