//! JSON snapshot files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{OutputResult, Snapshot};

/// Writes [`Snapshot`]s to one JSON file and reads them back.
///
/// Each write replaces the previous file contents.  The snapshot is first
/// written to a sibling `.tmp` file and then renamed over the target, so a
/// reader never sees a half-written file.
#[derive(Clone, Debug)]
pub struct JsonSnapshotWriter {
    path:   PathBuf,
    pretty: bool,
}

impl JsonSnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), pretty: true }
    }

    /// Write compact JSON instead of indented.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, snapshot: &Snapshot) -> OutputResult<()> {
        let content = if self.pretty {
            serde_json::to_string_pretty(snapshot)?
        } else {
            serde_json::to_string(snapshot)?
        };

        let tmp = self.path.with_extension("json.tmp");
        let mut file = File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            tick = %snapshot.tick,
            parcels = snapshot.parcels.len(),
            "snapshot written",
        );
        Ok(())
    }

    pub fn read(&self) -> OutputResult<Snapshot> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
