//! Integration tests for pd-output.

use pd_agent::{AgentPoolBuilder, Tier};
use pd_core::{DispatchConfig, ScriptedRng};
use pd_sim::{CoordinatorBuilder, DispatchCoordinator, ParcelRequest, Session};
use pd_spatial::RouteGraph;

// ── Helpers ───────────────────────────────────────────────────────────────────

const MISS: u32 = u32::MAX;

fn tmp() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn config() -> DispatchConfig {
    DispatchConfig { live_period_ms: 0, ..DispatchConfig::default() }
}

fn network() -> RouteGraph {
    let mut g = RouteGraph::new();
    for (name, zone) in [("Lahore", "Central"), ("Multan", "South"), ("Karachi", "South"), ("Sialkot", "North")] {
        g.add_city(name, zone).unwrap();
    }
    g.add_road_by_name("Lahore", "Multan", 340).unwrap();
    g.add_road_by_name("Multan", "Karachi", 900).unwrap();
    g.add_road_by_name("Lahore", "Sialkot", 130).unwrap();
    g
}

/// Three parcels: P1 dispatched to Karachi (Loading), P2 waiting, P3 under
/// investigation; Lahore–Sialkot blocked.
fn busy() -> DispatchCoordinator<ScriptedRng> {
    let agents = AgentPoolBuilder::new()
        .agent("Ali", 2, Tier::Standard)
        .agent("Zain", 1, Tier::Express)
        .build()
        .unwrap();
    let mut c = CoordinatorBuilder::new(config(), network(), agents, ScriptedRng::constant(MISS))
        .build()
        .unwrap();
    let session = Session::new("ops");
    for (id, dest) in [("P1", "Karachi"), ("P2", "Multan"), ("P3", "Sialkot")] {
        c.submit_confirmed(ParcelRequest::new(id, dest, 4.0, 1), &session).unwrap();
    }
    c.process_next_recommended().unwrap();
    c.report_missing("P3", "label torn").unwrap();
    c.set_road_blocked("Lahore", "Sialkot", true).unwrap();
    c.tick(pd_core::Tick(2)).unwrap();
    c
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::CsvWriter;
    use crate::row::{ParcelStatusRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn parcel_row(id: &str, tick: u64) -> ParcelStatusRow {
        ParcelStatusRow {
            tick,
            parcel_id:         id.to_string(),
            status:            "In Transit".to_string(),
            agent:             "Ali".to_string(),
            delivery_attempts: 1,
            eta_remaining:     Some(12),
        }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("parcel_status.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("parcel_status.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "parcel_id", "status", "agent", "delivery_attempts", "eta_remaining"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "transitions", "active", "pending"]);
    }

    #[test]
    fn csv_parcel_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let mut idle = parcel_row("P2", 4);
        idle.agent.clear();
        idle.eta_remaining = None;
        w.write_parcel_rows(&[parcel_row("P1", 4), idle]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("parcel_status.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "P1");
        assert_eq!(&rows[0][2], "In Transit");
        assert_eq!(&rows[0][5], "12");
        assert_eq!(&rows[1][3], "");
        assert_eq!(&rows[1][5], "");
    }

    #[test]
    fn csv_tick_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 3, transitions: 2, active: 5, pending: 1 }).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][2], "5");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn observer_records_live_loop() {
        use crate::observer::SnapshotObserver;
        use pd_sim::{CancelFlag, run_live};

        let mut c = busy();
        let dir = tmp();
        let mut obs = SnapshotObserver::new(CsvWriter::new(dir.path()).unwrap());
        run_live(&mut c, &CancelFlag::new(), &mut obs, Some(4)).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(summaries.len(), 4);
        assert_eq!(&summaries[0][0], "3");

        // P1 departs at T5 (tick 5 is the third iteration).
        let mut rdr = csv::Reader::from_path(dir.path().join("parcel_status.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert!(rows.iter().all(|r| &r[1] == "P1"));
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().any(|r| &r[0] == "5" && &r[2] == "In Transit"));
    }
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use super::*;
    use crate::{JsonSnapshotWriter, OutputError, Snapshot};
    use pd_core::{SimRng, Tick};
    use pd_lifecycle::ParcelStatus;

    #[test]
    fn capture_records_everything() {
        let c = busy();
        let s = Snapshot::capture(&c.view());
        assert_eq!(s.tick, Tick(2));
        assert_eq!(s.cities.len(), 4);
        assert_eq!(s.roads.len(), 3);
        assert_eq!(s.roads.iter().filter(|r| r.blocked).count(), 1);
        assert_eq!(s.agents.len(), 2);
        assert_eq!(s.agents.iter().map(|a| a.load).sum::<u32>(), 1);
        assert_eq!(s.parcels.len(), 3);
        assert!(s.parcels[0].history().len() >= 4);
    }

    #[test]
    fn restore_reproduces_state() {
        let c = busy();
        let s = Snapshot::capture(&c.view());
        let mut r = s.restore(config(), ScriptedRng::constant(MISS)).unwrap();

        assert_eq!(r.now(), Tick(2));
        assert_eq!(r.graph().city_count(), 4);
        assert_eq!(r.graph().road_count(), 3);
        let sialkot = r.graph().city_by_name("Sialkot").unwrap();
        let lahore = r.graph().city_by_name("Lahore").unwrap();
        assert_eq!(r.graph().is_blocked(lahore, sialkot), Some(true));

        assert_eq!(r.agents().get("Ali").unwrap().load(), 1);
        assert_eq!(r.agents().get("Zain").unwrap().tier(), Tier::Express);

        for (before, after) in c.parcels().iter().zip(r.parcels().iter()) {
            assert_eq!(before, after);
        }
        assert_eq!(r.parcel("P1").unwrap().assigned_agent(), Some("Ali"));
        assert_eq!(r.in_transit().count(), 1);
        assert_eq!(r.undo_len(), 0);

        // P2 is queued again; P3 stays under investigation.
        let out = r.process_next_recommended().unwrap();
        assert_eq!(out.dispatched().unwrap().parcel_id, "P2");
        assert_eq!(r.parcel("P3").unwrap().status(), ParcelStatus::UnderInvestigation);
    }

    #[test]
    fn restore_keeps_route_discovery_order() {
        let mut g = RouteGraph::new();
        for name in ["Lahore", "B", "C", "D"] {
            g.add_city(name, "Z").unwrap();
        }
        for (u, v, d) in [("C", "D", 4), ("B", "C", 3), ("Lahore", "C", 7), ("Lahore", "B", 2), ("B", "D", 9)] {
            g.add_road_by_name(u, v, d).unwrap();
        }
        let agents = AgentPoolBuilder::new().agent("Ali", 1, Tier::Standard).build().unwrap();
        let c = CoordinatorBuilder::new(config(), g, agents, ScriptedRng::constant(MISS))
            .build()
            .unwrap();

        let r = Snapshot::capture(&c.view())
            .restore(config(), ScriptedRng::constant(MISS))
            .unwrap();

        let routes = |coord: &DispatchCoordinator<ScriptedRng>| {
            let g = coord.graph();
            let (from, to) = (g.require("Lahore").unwrap(), g.require("D").unwrap());
            let found = g.find_all_paths(from, to, 5).unwrap();
            found.iter().map(|p| p.describe(g)).collect::<Vec<_>>()
        };
        let before = routes(&c);
        assert_eq!(before[0], "Lahore -> C -> D");
        assert_eq!(routes(&r), before);
    }

    #[test]
    fn json_file_round_trip() {
        let c = busy();
        let dir = tmp();
        let json = JsonSnapshotWriter::new(dir.path().join("snapshot.json"));
        let s = Snapshot::capture(&c.view());
        json.write(&s).unwrap();
        assert!(!dir.path().join("snapshot.json.tmp").exists());
        assert_eq!(json.read().unwrap(), s);

        let compact = JsonSnapshotWriter::new(dir.path().join("compact.json")).compact();
        compact.write(&s).unwrap();
        assert_eq!(compact.read().unwrap(), s);
    }

    #[test]
    fn inconsistent_load_rejected() {
        let c = busy();
        let mut s = Snapshot::capture(&c.view());
        s.agents[0].load = 0;
        assert!(matches!(s.restore(config(), SimRng::new(1)), Err(OutputError::Inconsistent(_))));
    }

    #[test]
    fn unknown_agent_rejected() {
        let c = busy();
        let mut s = Snapshot::capture(&c.view());
        s.agents.retain(|a| a.name != "Ali");
        assert!(matches!(s.restore(config(), SimRng::new(1)), Err(OutputError::Inconsistent(_))));
    }

    #[test]
    fn road_to_unknown_city_rejected() {
        let c = busy();
        let mut s = Snapshot::capture(&c.view());
        s.roads[0].to = "Quetta".into();
        assert!(matches!(s.restore(config(), SimRng::new(1)), Err(OutputError::Network(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tmp();
        let json = JsonSnapshotWriter::new(dir.path().join("absent.json"));
        assert!(matches!(json.read(), Err(OutputError::Io(_))));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let dir = tmp();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"tick\": 3, \"cities\": [").unwrap();
        let json = JsonSnapshotWriter::new(path);
        assert!(matches!(json.read(), Err(OutputError::Json(_))));
    }

    #[test]
    fn observer_writes_periodic_snapshots() {
        use crate::csv::CsvWriter;
        use crate::observer::SnapshotObserver;
        use pd_sim::{CancelFlag, run_live};

        let mut c = busy();
        let dir = tmp();
        let path = dir.path().join("live.json");
        let mut obs = SnapshotObserver::new(CsvWriter::new(dir.path()).unwrap())
            .with_snapshots(JsonSnapshotWriter::new(&path), 4);
        run_live(&mut c, &CancelFlag::new(), &mut obs, Some(3)).unwrap();
        assert!(obs.take_error().is_none());

        let s = JsonSnapshotWriter::new(&path).read().unwrap();
        assert_eq!(s.tick, Tick(4));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::tmp;
    use crate::row::{ParcelStatusRow, TickSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_parcel_rows() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = |id: &str, eta| ParcelStatusRow {
            tick:              9,
            parcel_id:         id.to_string(),
            status:            "Loading".to_string(),
            agent:             "Ali".to_string(),
            delivery_attempts: 0,
            eta_remaining:     eta,
        };
        w.write_parcel_rows(&[row("P1", Some(20)), row("P2", None)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM parcel_status", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 2);
        let eta: Option<i64> = conn
            .query_row("SELECT eta_remaining FROM parcel_status WHERE parcel_id = 'P2'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(eta, None);
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 7, transitions: 3, active: 2, pending: 4 }).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("output.db")).unwrap();
        let (tick, transitions, pending): (i64, i64, i64) = conn
            .query_row(
                "SELECT tick, transitions, pending FROM tick_summaries WHERE tick = 7",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!((tick, transitions, pending), (7, 3, 4));
    }
}
