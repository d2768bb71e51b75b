//! Route discovery: bounded enumeration of simple paths.
//!
//! # Pluggability
//!
//! The coordinator calls route discovery through the [`RouteFinder`] trait,
//! so an application can swap in a different strategy (k-shortest paths,
//! A*) without touching the dispatch core.  The default [`DfsRouteFinder`]
//! enumerates simple paths depth-first.
//!
//! # Candidate semantics
//!
//! A [`RouteSet`] holds the **first `limit` paths discovered** in DFS order,
//! which follows adjacency insertion order.  It is neither "all paths" nor
//! "the `limit` shortest": the recommended route
//! ([`RouteSet::min_route_index`]) is the shortest *among the retained
//! candidates* and may be longer than the true shortest path in the graph.

use pd_core::CityId;

use crate::{RouteGraph, SpatialError, SpatialResult};

// ── Path / RouteSet ───────────────────────────────────────────────────────────

/// A simple path from source to destination and its total distance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    /// Cities visited in order, including both endpoints.
    pub cities:   Vec<CityId>,
    /// Sum of road distances along the path.
    pub distance: u32,
}

impl Path {
    /// Number of roads traversed.
    pub fn hops(&self) -> usize {
        self.cities.len().saturating_sub(1)
    }

    /// `true` if source and destination are the same city.
    pub fn is_trivial(&self) -> bool {
        self.cities.len() <= 1
    }

    /// Render as `A -> B -> C` using the graph's city names.
    pub fn describe(&self, graph: &RouteGraph) -> String {
        self.cities
            .iter()
            .map(|&c| graph.city(c).map(|c| c.name.as_str()).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

/// The retained candidate routes of one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteSet {
    paths: Vec<Path>,
}

impl RouteSet {
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    /// Index of the minimum-distance candidate (first one on ties), or
    /// `None` when no route was found.
    pub fn min_route_index(&self) -> Option<usize> {
        self.paths
            .iter()
            .enumerate()
            .min_by_key(|&(i, p)| (p.distance, i))
            .map(|(i, _)| i)
    }

    /// The minimum-distance candidate.
    pub fn recommended(&self) -> Option<&Path> {
        self.min_route_index().and_then(|i| self.paths.get(i))
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }
}

impl<'a> IntoIterator for &'a RouteSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

// ── RouteFinder trait ─────────────────────────────────────────────────────────

/// Pluggable route discovery.
pub trait RouteFinder {
    /// Discover up to `limit` candidate routes from `from` to `to`.
    ///
    /// Blocked roads are never traversed.  An empty set means the
    /// destination is currently unreachable; unknown city ids are errors.
    fn find_routes(
        &self,
        graph: &RouteGraph,
        from:  CityId,
        to:    CityId,
        limit: usize,
    ) -> SpatialResult<RouteSet>;
}

// ── DfsRouteFinder ────────────────────────────────────────────────────────────

/// Exhaustive depth-first enumeration of simple paths.
///
/// A city is marked visited on entry and unmarked on exit, so it can appear
/// on many different candidate paths but never twice on the same one.  The
/// walk shares one path buffer (push on entry, pop on exit) and copies it
/// only when a complete path is recorded.
///
/// The walk stops descending once `limit` paths have been recorded.  Any
/// path found after that point would have been discarded, so the retained
/// set is the same as with a full traversal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsRouteFinder;

impl RouteFinder for DfsRouteFinder {
    fn find_routes(
        &self,
        graph: &RouteGraph,
        from:  CityId,
        to:    CityId,
        limit: usize,
    ) -> SpatialResult<RouteSet> {
        graph.find_all_paths(from, to, limit)
    }
}

impl RouteGraph {
    /// Enumerate simple paths from `start` to `end`, keeping the first
    /// `limit` found.  See [`DfsRouteFinder`] for traversal semantics.
    pub fn find_all_paths(&self, start: CityId, end: CityId, limit: usize) -> SpatialResult<RouteSet> {
        for id in [start, end] {
            if self.city(id).is_none() {
                return Err(SpatialError::CityNotFound(id));
            }
        }
        if limit == 0 {
            return Ok(RouteSet::default());
        }

        let mut search = Search {
            graph:   self,
            end,
            limit,
            visited: vec![false; self.city_count()],
            path:    Vec::new(),
            found:   Vec::new(),
        };
        search.visit(start, 0);
        Ok(RouteSet::new(search.found))
    }
}

/// Mutable DFS state threaded through the recursion.
struct Search<'g> {
    graph:   &'g RouteGraph,
    end:     CityId,
    limit:   usize,
    visited: Vec<bool>,
    path:    Vec<CityId>,
    found:   Vec<Path>,
}

impl Search<'_> {
    fn visit(&mut self, city: CityId, distance: u32) {
        self.visited[city.index()] = true;
        self.path.push(city);

        if city == self.end {
            self.found.push(Path { cities: self.path.clone(), distance });
        } else {
            for edge in self.graph.neighbors(city) {
                if self.found.len() >= self.limit {
                    break;
                }
                if !edge.blocked && !self.visited[edge.to.index()] {
                    self.visit(edge.to, distance.saturating_add(edge.distance));
                }
            }
        }

        self.path.pop();
        self.visited[city.index()] = false;
    }
}
