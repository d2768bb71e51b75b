//! CSV roster loader.
//!
//! # CSV format
//!
//! One row per agent, in ring order.  `tier` is `Standard` or `Express`
//! (case-insensitive) or the numeric level `1` / `2`.
//!
//! ```csv
//! name,capacity,tier
//! Ali Khan,1,Standard
//! Asad Malik,1,Express
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{Agent, AgentError, AgentPool, AgentResult, Tier};

#[derive(Deserialize)]
struct RosterRecord {
    name:     String,
    capacity: u32,
    tier:     String,
}

/// Load an [`AgentPool`] from a roster CSV file.
pub fn load_roster_csv(path: &Path) -> AgentResult<AgentPool> {
    let file = std::fs::File::open(path).map_err(|e| AgentError::Parse(e.to_string()))?;
    load_roster_reader(file)
}

/// Like [`load_roster_csv`] but accepts any `Read` source.
pub fn load_roster_reader<R: Read>(reader: R) -> AgentResult<AgentPool> {
    let mut pool = AgentPool::new();
    for (line, result) in csv::Reader::from_reader(reader).deserialize::<RosterRecord>().enumerate() {
        let row = result.map_err(|e| AgentError::Parse(e.to_string()))?;
        let tier: Tier = row.tier.parse()?;
        pool.push(Agent::new(row.name.trim(), row.capacity, tier))
            .map_err(|e| AgentError::Parse(format!("roster row {}: {e}", line + 1)))?;
    }
    Ok(pool)
}
