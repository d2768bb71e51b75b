//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `parcel_status` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, ParcelStatusRow, TickSummaryRow};

/// Writes parcel observations and tick summaries to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS parcel_status (
                 tick              INTEGER NOT NULL,
                 parcel_id         TEXT    NOT NULL,
                 status            TEXT    NOT NULL,
                 agent             TEXT    NOT NULL,
                 delivery_attempts INTEGER NOT NULL,
                 eta_remaining     INTEGER
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick        INTEGER PRIMARY KEY,
                 transitions INTEGER NOT NULL,
                 active      INTEGER NOT NULL,
                 pending     INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_parcel_rows(&mut self, rows: &[ParcelStatusRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO parcel_status \
                 (tick, parcel_id, status, agent, delivery_attempts, eta_remaining) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.parcel_id,
                    row.status,
                    row.agent,
                    row.delivery_attempts,
                    row.eta_remaining.map(|s| s as i64),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO tick_summaries (tick, transitions, active, pending) \
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.tick as i64, row.transitions as i64, row.active as i64, row.pending as i64],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
