//! City road graph.
//!
//! # Data layout
//!
//! Cities are indexed by [`CityId`] (sequential from 0, in insertion order).
//! Each city owns a `Vec<Edge>` of outgoing directed records; an undirected
//! road is stored as **two** records, one in each endpoint's list.  The
//! order of each list is the order roads were added, and path discovery
//! walks it in that order, so insertion order determines which candidate
//! routes are found first.  The graph also keeps a log of roads in the order
//! they were added; replaying [`RouteGraph::roads`] into an empty graph
//! rebuilds every adjacency list in the same order.
//!
//! # Blocking
//!
//! A road's `blocked` flag lives on both directed records.  Every mutation
//! goes through [`RouteGraph::set_blocked`], which flips both, so the graph
//! stays symmetric: `u → v` is blocked iff `v → u` is blocked.

use std::collections::HashMap;

use pd_core::{CityId, DispatchRng};
use tracing::warn;

use crate::{SpatialError, SpatialResult};

// ── City / Edge / Road ────────────────────────────────────────────────────────

/// A named stop on the network.  The zone is copied onto parcels addressed
/// to this city at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct City {
    pub name: String,
    pub zone: String,
}

/// One directed adjacency record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub to:       CityId,
    pub distance: u32,
    pub blocked:  bool,
}

/// An undirected road as seen from outside the graph (`u < v`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Road {
    pub u:        CityId,
    pub v:        CityId,
    pub distance: u32,
    pub blocked:  bool,
}

// ── RouteGraph ────────────────────────────────────────────────────────────────

/// Undirected, mutable road network.
///
/// The city list is unbounded; lookups by name go through a hash index.
#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    cities:    Vec<City>,
    adjacency: Vec<Vec<Edge>>,
    by_name:   HashMap<String, CityId>,
    /// `(u, position of the u → v record in u's list, v)` per road, in
    /// insertion order.
    road_log:  Vec<(CityId, usize, CityId)>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a city and return its `CityId` (sequential from 0).
    pub fn add_city(&mut self, name: impl Into<String>, zone: impl Into<String>) -> SpatialResult<CityId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(SpatialError::DuplicateCity(name));
        }
        let id = CityId::try_from(self.cities.len())
            .map_err(|_| SpatialError::Parse("city count exceeds u32".into()))?;
        self.by_name.insert(name.clone(), id);
        self.cities.push(City { name, zone: zone.into() });
        self.adjacency.push(Vec::new());
        Ok(id)
    }

    /// Add an undirected road of `distance` km between `u` and `v`.
    ///
    /// Stored as two directed records.  Parallel roads are allowed and are
    /// treated as distinct edges by path discovery.
    pub fn add_road(&mut self, u: CityId, v: CityId, distance: u32) -> SpatialResult<()> {
        self.check(u)?;
        self.check(v)?;
        if u == v {
            return Err(SpatialError::SelfLoop(u));
        }
        let at = self.adjacency[u.index()].len();
        self.adjacency[u.index()].push(Edge { to: v, distance, blocked: false });
        self.adjacency[v.index()].push(Edge { to: u, distance, blocked: false });
        self.road_log.push((u, at, v));
        Ok(())
    }

    /// Convenience: add a road between two cities looked up by name.
    pub fn add_road_by_name(&mut self, u: &str, v: &str, distance: u32) -> SpatialResult<()> {
        let u = self.require(u)?;
        let v = self.require(v)?;
        self.add_road(u, v, distance)
    }

    // ── Blocking ──────────────────────────────────────────────────────────

    /// Block or unblock every road joining `u` and `v`, in both directions.
    ///
    /// Returns the number of directed records updated (2 per road).
    pub fn set_blocked(&mut self, u: CityId, v: CityId, blocked: bool) -> SpatialResult<usize> {
        self.check(u)?;
        self.check(v)?;
        let mut touched = 0;
        for (from, to) in [(u, v), (v, u)] {
            for edge in self.adjacency[from.index()].iter_mut().filter(|e| e.to == to) {
                edge.blocked = blocked;
                touched += 1;
            }
        }
        if touched == 0 {
            return Err(SpatialError::RoadNotFound { u, v });
        }
        Ok(touched)
    }

    /// `Some(blocked)` for the first road joining `u` and `v`, `None` if
    /// they are not adjacent.
    pub fn is_blocked(&self, u: CityId, v: CityId) -> Option<bool> {
        self.adjacency
            .get(u.index())?
            .iter()
            .find(|e| e.to == v)
            .map(|e| e.blocked)
    }

    /// Environmental fault hook: pick a uniformly random city, then a
    /// uniformly random road incident to it, and block that road.
    ///
    /// Returns the blocked endpoints, or `None` if the graph has fewer than
    /// two cities or the chosen city has no roads.
    pub fn block_random_road<R: DispatchRng + ?Sized>(&mut self, rng: &mut R) -> Option<(CityId, CityId)> {
        if self.cities.len() < 2 {
            return None;
        }
        let u = CityId(rng.below(self.cities.len() as u32));
        let edges = &self.adjacency[u.index()];
        if edges.is_empty() {
            return None;
        }
        let v = edges[rng.below(edges.len() as u32) as usize].to;
        self.set_blocked(u, v, true).ok()?;
        warn!(
            from = %self.cities[u.index()].name,
            to = %self.cities[v.index()].name,
            "road blocked",
        );
        Some((u, v))
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Number of undirected roads.
    pub fn road_count(&self) -> usize {
        self.road_log.len()
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id.index())
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city_by_name(&self, name: &str) -> Option<CityId> {
        self.by_name.get(name).copied()
    }

    /// Zone of the named city, if it exists.
    pub fn zone_of(&self, name: &str) -> Option<&str> {
        self.city_by_name(name)
            .and_then(|id| self.city(id))
            .map(|c| c.zone.as_str())
    }

    /// Outgoing records of `id`, in insertion order.  Empty for unknown ids.
    pub fn neighbors(&self, id: CityId) -> &[Edge] {
        self.adjacency.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every undirected road exactly once (`u < v`), in the order roads
    /// were added.
    pub fn roads(&self) -> impl Iterator<Item = Road> + '_ {
        self.road_log.iter().filter_map(|&(u, at, v)| {
            let e = self.adjacency.get(u.index())?.get(at)?;
            let (u, v) = if u < v { (u, v) } else { (v, u) };
            Some(Road { u, v, distance: e.distance, blocked: e.blocked })
        })
    }

    /// Roads currently blocked.
    pub fn blocked_roads(&self) -> impl Iterator<Item = Road> + '_ {
        self.roads().filter(|r| r.blocked)
    }

    /// Resolve a city name or fail with [`SpatialError::UnknownCity`].
    pub fn require(&self, name: &str) -> SpatialResult<CityId> {
        self.city_by_name(name)
            .ok_or_else(|| SpatialError::UnknownCity(name.to_string()))
    }

    fn check(&self, id: CityId) -> SpatialResult<()> {
        if id.index() < self.cities.len() {
            Ok(())
        } else {
            Err(SpatialError::CityNotFound(id))
        }
    }
}
