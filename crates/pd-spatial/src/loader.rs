//! CSV network loader.
//!
//! # CSV format
//!
//! Two sources: one row per city, then one row per undirected road.  Road
//! endpoints refer to cities by name.
//!
//! ```csv
//! name,zone
//! Lahore,A
//! Islamabad,B
//! ```
//!
//! ```csv
//! from,to,distance
//! Lahore,Islamabad,375
//! ```
//!
//! Roads are added in file order, which fixes the adjacency order that
//! route discovery walks.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{RouteGraph, SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CityRecord {
    name: String,
    zone: String,
}

#[derive(Deserialize)]
struct RoadRecord {
    from:     String,
    to:       String,
    distance: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`RouteGraph`] from a cities CSV file and a roads CSV file.
pub fn load_network_csv(cities: &Path, roads: &Path) -> SpatialResult<RouteGraph> {
    let cities = std::fs::File::open(cities).map_err(SpatialError::Io)?;
    let roads = std::fs::File::open(roads).map_err(SpatialError::Io)?;
    load_network_reader(cities, roads)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Duplicate city names and roads naming an unknown city are rejected with
/// [`SpatialError::Parse`].
pub fn load_network_reader<C: Read, R: Read>(cities: C, roads: R) -> SpatialResult<RouteGraph> {
    let mut graph = RouteGraph::new();

    // ── Cities ────────────────────────────────────────────────────────────
    for (line, result) in csv::Reader::from_reader(cities).deserialize::<CityRecord>().enumerate() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        let name = row.name.trim();
        if name.is_empty() {
            return Err(SpatialError::Parse(format!("cities row {}: empty city name", line + 1)));
        }
        graph
            .add_city(name, row.zone.trim())
            .map_err(|e| SpatialError::Parse(format!("cities row {}: {e}", line + 1)))?;
    }

    // ── Roads ─────────────────────────────────────────────────────────────
    for (line, result) in csv::Reader::from_reader(roads).deserialize::<RoadRecord>().enumerate() {
        let row = result.map_err(|e| SpatialError::Parse(e.to_string()))?;
        graph
            .add_road_by_name(row.from.trim(), row.to.trim(), row.distance)
            .map_err(|e| SpatialError::Parse(format!("roads row {}: {e}", line + 1)))?;
    }

    Ok(graph)
}
