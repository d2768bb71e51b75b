//! Unit tests for pd-spatial.

use std::io::Cursor;

use pd_core::{CityId, ScriptedRng};

use crate::{DfsRouteFinder, RouteFinder, RouteGraph, SpatialError, load_network_reader};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A–B 10, B–C 20, A–C 50.
fn triangle() -> (RouteGraph, CityId, CityId, CityId) {
    let mut g = RouteGraph::new();
    let a = g.add_city("A", "Z1").unwrap();
    let b = g.add_city("B", "Z1").unwrap();
    let c = g.add_city("C", "Z2").unwrap();
    g.add_road(a, b, 10).unwrap();
    g.add_road(b, c, 20).unwrap();
    g.add_road(a, c, 50).unwrap();
    (g, a, b, c)
}

/// Complete graph on `n` cities, every road length 1.
fn complete(n: usize) -> RouteGraph {
    let mut g = RouteGraph::new();
    let ids: Vec<CityId> = (0..n).map(|i| g.add_city(format!("c{i}"), "Z").unwrap()).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            g.add_road(ids[i], ids[j], 1).unwrap();
        }
    }
    g
}

// ── Graph construction ────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let (g, a, b, c) = triangle();
        assert_eq!((a, b, c), (CityId(0), CityId(1), CityId(2)));
        assert_eq!(g.city_count(), 3);
        assert_eq!(g.road_count(), 3);
    }

    #[test]
    fn duplicate_city_rejected() {
        let (mut g, ..) = triangle();
        assert!(matches!(g.add_city("A", "Z9"), Err(SpatialError::DuplicateCity(n)) if n == "A"));
        assert_eq!(g.city_count(), 3);
    }

    #[test]
    fn self_loop_rejected() {
        let (mut g, a, ..) = triangle();
        assert!(matches!(g.add_road(a, a, 5), Err(SpatialError::SelfLoop(_))));
    }

    #[test]
    fn road_to_unknown_city_rejected() {
        let (mut g, a, ..) = triangle();
        assert!(matches!(g.add_road(a, CityId(99), 5), Err(SpatialError::CityNotFound(_))));
        assert!(matches!(g.add_road_by_name("A", "Nowhere", 5), Err(SpatialError::UnknownCity(_))));
    }

    #[test]
    fn roads_listed_once_in_insertion_order() {
        let (g, a, b, c) = triangle();
        let roads: Vec<_> = g.roads().map(|r| (r.u, r.v, r.distance)).collect();
        assert_eq!(roads, vec![(a, b, 10), (b, c, 20), (a, c, 50)]);
    }

    #[test]
    fn replaying_roads_preserves_adjacency_order() {
        let mut g = RouteGraph::new();
        for name in ["Lahore", "B", "C", "D"] {
            g.add_city(name, "Z").unwrap();
        }
        for (u, v, d) in [("C", "D", 4), ("B", "C", 3), ("Lahore", "C", 7), ("Lahore", "B", 2), ("B", "D", 9)] {
            g.add_road_by_name(u, v, d).unwrap();
        }

        let mut rebuilt = RouteGraph::new();
        for city in g.cities() {
            rebuilt.add_city(city.name.as_str(), city.zone.as_str()).unwrap();
        }
        for r in g.roads() {
            rebuilt.add_road(r.u, r.v, r.distance).unwrap();
        }

        for id in 0..4 {
            assert_eq!(rebuilt.neighbors(CityId(id)), g.neighbors(CityId(id)));
        }
        let (lahore, d) = (g.require("Lahore").unwrap(), g.require("D").unwrap());
        assert_eq!(
            rebuilt.find_all_paths(lahore, d, 5).unwrap(),
            g.find_all_paths(lahore, d, 5).unwrap(),
        );
    }

    #[test]
    fn zone_lookup() {
        let (g, ..) = triangle();
        assert_eq!(g.zone_of("C"), Some("Z2"));
        assert_eq!(g.zone_of("D"), None);
    }

    #[test]
    fn neighbors_of_unknown_city_is_empty() {
        let (g, ..) = triangle();
        assert!(g.neighbors(CityId(42)).is_empty());
    }
}

// ── Blocking ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod blocking {
    use super::*;

    #[test]
    fn set_blocked_is_symmetric() {
        let (mut g, a, b, _) = triangle();
        assert_eq!(g.set_blocked(a, b, true).unwrap(), 2);
        assert_eq!(g.is_blocked(a, b), Some(true));
        assert_eq!(g.is_blocked(b, a), Some(true));

        g.set_blocked(b, a, false).unwrap();
        assert_eq!(g.is_blocked(a, b), Some(false));
        assert_eq!(g.is_blocked(b, a), Some(false));
    }

    #[test]
    fn blocking_missing_road_fails() {
        let mut g = RouteGraph::new();
        let a = g.add_city("A", "Z").unwrap();
        let b = g.add_city("B", "Z").unwrap();
        assert!(matches!(g.set_blocked(a, b, true), Err(SpatialError::RoadNotFound { .. })));
        assert_eq!(g.is_blocked(a, b), None);
    }

    #[test]
    fn random_block_uses_rng_draws() {
        let (mut g, a, _, c) = triangle();
        // City 0 (A), second incident road (A–C).
        let mut rng = ScriptedRng::new([0, 1]);
        assert_eq!(g.block_random_road(&mut rng), Some((a, c)));
        assert_eq!(g.is_blocked(c, a), Some(true));
        assert_eq!(g.blocked_roads().count(), 1);
    }

    #[test]
    fn random_block_on_single_city_is_noop() {
        let mut g = RouteGraph::new();
        g.add_city("Solo", "Z").unwrap();
        assert_eq!(g.block_random_road(&mut ScriptedRng::constant(0)), None);
    }

    #[test]
    fn random_block_on_isolated_city_is_noop() {
        let mut g = RouteGraph::new();
        g.add_city("A", "Z").unwrap();
        g.add_city("B", "Z").unwrap();
        assert_eq!(g.block_random_road(&mut ScriptedRng::constant(0)), None);
    }
}

// ── Route discovery ───────────────────────────────────────────────────────────

#[cfg(test)]
mod paths {
    use super::*;

    #[test]
    fn triangle_finds_both_routes() {
        let (g, a, b, c) = triangle();
        let routes = g.find_all_paths(a, c, 5).unwrap();
        assert_eq!(routes.len(), 2);

        // A's adjacency is [B, C], so the detour is found first.
        assert_eq!(routes.get(0).unwrap().cities, vec![a, b, c]);
        assert_eq!(routes.get(0).unwrap().distance, 30);
        assert_eq!(routes.get(1).unwrap().cities, vec![a, c]);
        assert_eq!(routes.get(1).unwrap().distance, 50);

        assert_eq!(routes.min_route_index(), Some(0));
        assert_eq!(routes.recommended().unwrap().distance, 30);
    }

    #[test]
    fn blocked_road_is_skipped() {
        let (mut g, a, b, c) = triangle();
        g.set_blocked(b, c, true).unwrap();
        let routes = g.find_all_paths(a, c, 5).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes.recommended().unwrap().cities, vec![a, c]);
    }

    #[test]
    fn unreachable_gives_empty_set() {
        let (mut g, a, _, c) = triangle();
        let d = g.add_city("D", "Z3").unwrap();
        assert!(g.find_all_paths(a, d, 5).unwrap().is_empty());

        g.set_blocked(a, c, true).unwrap();
        g.set_blocked(a, CityId(1), true).unwrap();
        let routes = g.find_all_paths(a, c, 5).unwrap();
        assert!(routes.is_empty());
        assert_eq!(routes.min_route_index(), None);
    }

    #[test]
    fn same_start_and_end_is_trivial_path() {
        let (g, a, ..) = triangle();
        let routes = g.find_all_paths(a, a, 5).unwrap();
        assert_eq!(routes.len(), 1);
        let p = routes.get(0).unwrap();
        assert!(p.is_trivial());
        assert_eq!(p.distance, 0);
        assert_eq!(p.hops(), 0);
    }

    #[test]
    fn candidate_count_is_capped() {
        // K6 has 65 simple paths between any two vertices.
        let g = complete(6);
        let routes = g.find_all_paths(CityId(0), CityId(5), 5).unwrap();
        assert_eq!(routes.len(), 5);
        let unlimited = g.find_all_paths(CityId(0), CityId(5), usize::MAX).unwrap();
        assert_eq!(unlimited.len(), 65);
        // The capped set is a prefix of the full enumeration.
        assert_eq!(routes.iter().collect::<Vec<_>>(), unlimited.iter().take(5).collect::<Vec<_>>());
    }

    #[test]
    fn ties_pick_first_candidate() {
        let mut g = RouteGraph::new();
        let a = g.add_city("A", "Z").unwrap();
        let b = g.add_city("B", "Z").unwrap();
        let c = g.add_city("C", "Z").unwrap();
        g.add_road(a, b, 10).unwrap();
        g.add_road(b, c, 10).unwrap();
        g.add_road(a, c, 20).unwrap();
        let routes = g.find_all_paths(a, c, 5).unwrap();
        assert_eq!(routes.min_route_index(), Some(0));
    }

    #[test]
    fn unknown_endpoint_is_error() {
        let (g, a, ..) = triangle();
        assert!(matches!(g.find_all_paths(a, CityId(9), 5), Err(SpatialError::CityNotFound(_))));
    }

    #[test]
    fn finder_trait_matches_graph_method() {
        let (g, a, _, c) = triangle();
        let via_trait = DfsRouteFinder.find_routes(&g, a, c, 5).unwrap();
        assert_eq!(via_trait, g.find_all_paths(a, c, 5).unwrap());
    }

    #[test]
    fn describe_uses_city_names() {
        let (g, a, _, c) = triangle();
        let routes = g.find_all_paths(a, c, 5).unwrap();
        assert_eq!(routes.get(0).unwrap().describe(&g), "A -> B -> C");
    }
}

// ── Route validity (property) ─────────────────────────────────────────────────

#[cfg(test)]
mod path_properties {
    use super::*;
    use proptest::prelude::*;

    /// Random graph on up to 7 cities: (city count, road list, blocked mask).
    fn network_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>, Vec<bool>)> {
        (2usize..=7).prop_flat_map(|n| {
            let road = (0..n, 0..n, 1u32..100);
            (
                Just(n),
                proptest::collection::vec(road, 0..15),
                proptest::collection::vec(any::<bool>(), 15),
            )
        })
    }

    proptest! {
        /// Every returned path is simple, follows existing unblocked roads,
        /// starts and ends at the requested cities, and sums its distances.
        #[test]
        fn returned_paths_are_valid((n, roads, mask) in network_strategy()) {
            let mut g = RouteGraph::new();
            let ids: Vec<CityId> = (0..n).map(|i| g.add_city(format!("c{i}"), "Z").unwrap()).collect();
            for &(u, v, d) in &roads {
                if u != v {
                    g.add_road(ids[u], ids[v], d).unwrap();
                }
            }
            for (i, &(u, v, _)) in roads.iter().enumerate() {
                if u != v && mask[i] {
                    g.set_blocked(ids[u], ids[v], true).unwrap();
                }
            }

            let from = ids[0];
            let to = ids[n - 1];
            let routes = g.find_all_paths(from, to, 5).unwrap();
            prop_assert!(routes.len() <= 5);

            for path in &routes {
                prop_assert_eq!(path.cities.first().copied(), Some(from));
                prop_assert_eq!(path.cities.last().copied(), Some(to));

                let mut seen = std::collections::HashSet::new();
                for c in &path.cities {
                    prop_assert!(seen.insert(*c), "city {} repeated", c);
                }

                let mut total = 0u32;
                for hop in path.cities.windows(2) {
                    let edge = g
                        .neighbors(hop[0])
                        .iter()
                        .find(|e| e.to == hop[1] && !e.blocked);
                    prop_assert!(edge.is_some(), "no open road {} -> {}", hop[0], hop[1]);
                    total += edge.map(|e| e.distance).unwrap_or(0);
                }
                // Parallel roads may differ in length; the path must match one
                // of them, so only check when the hop sequence is unambiguous.
                if path.cities.windows(2).all(|h| g.neighbors(h[0]).iter().filter(|e| e.to == h[1]).count() == 1) {
                    prop_assert_eq!(total, path.distance);
                }
            }
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    const CITIES: &str = "name,zone\nLahore,A\nIslamabad,B\nRawalpindi,B\n";
    const ROADS: &str = "from,to,distance\nLahore,Islamabad,375\nIslamabad,Rawalpindi,20\n";

    #[test]
    fn loads_cities_and_roads() {
        let g = load_network_reader(Cursor::new(CITIES), Cursor::new(ROADS)).unwrap();
        assert_eq!(g.city_count(), 3);
        assert_eq!(g.road_count(), 2);
        assert_eq!(g.zone_of("Rawalpindi"), Some("B"));

        let lhr = g.city_by_name("Lahore").unwrap();
        let rwp = g.city_by_name("Rawalpindi").unwrap();
        let routes = g.find_all_paths(lhr, rwp, 5).unwrap();
        assert_eq!(routes.recommended().unwrap().distance, 395);
    }

    #[test]
    fn unknown_city_in_roads_is_parse_error() {
        let roads = "from,to,distance\nLahore,Karachi,1200\n";
        let err = load_network_reader(Cursor::new(CITIES), Cursor::new(roads)).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(msg) if msg.contains("Karachi")));
    }

    #[test]
    fn duplicate_city_is_parse_error() {
        let cities = "name,zone\nLahore,A\nLahore,B\n";
        let err = load_network_reader(Cursor::new(cities), Cursor::new("from,to,distance\n")).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(_)));
    }

    #[test]
    fn bad_distance_is_parse_error() {
        let roads = "from,to,distance\nLahore,Islamabad,far\n";
        let err = load_network_reader(Cursor::new(CITIES), Cursor::new(roads)).unwrap_err();
        assert!(matches!(err, SpatialError::Parse(_)));
    }
}
