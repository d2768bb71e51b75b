//! hq: scripted session against the parcel dispatch engine.
//!
//! Builds the default ten-city network and ten-rider roster, submits a batch
//! of parcels from HQ, dispatches them, exercises the administrative actions,
//! then runs the live loop on a background thread while the main thread
//! keeps issuing requests through the shared handle.
//!
//! Usage: `hq [config.json]`.  Set `RUST_LOG=debug` for per-tick transitions.

mod network;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pd_core::{DispatchConfig, SimRng};
use pd_output::{CsvWriter, JsonSnapshotWriter, Snapshot, SnapshotObserver};
use pd_sim::{
    CancelFlag, CoordinatorBuilder, DispatchCoordinator, DispatchOutcome, ParcelRequest, Resolution,
    Session, SharedCoordinator,
};

use network::{default_network, default_roster};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:         &str = "output/hq";
const DEMO_PERIOD_MS:     u64  = 50;   // wall time per live iteration
const LIVE_ITERATIONS:    u64  = 120;
const SNAPSHOT_EVERY:     u64  = 30;   // ticks between JSON snapshots

/// `(id, destination, weight kg, priority)`
const ORDERS: [(&str, &str, f64, i64); 8] = [
    ("PK-1001", "Karachi", 12.5, 1),
    ("PK-1002", "Islamabad", 2.0, 3),
    ("PK-1003", "Peshawar", 7.8, 2),
    ("PK-1004", "Quetta", 22.0, 1),
    ("PK-1005", "Rawalpindi", 1.2, 3),
    ("PK-1006", "Multan", 4.4, 2),
    ("PK-1007", "Sukkur", 15.0, 1),
    ("PK-1008", "Faisalabad", 3.3, 2),
];

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<DispatchConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening config {path}"))?;
            let config: DispatchConfig =
                serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing config {path}"))?;
            info!(%path, "configuration loaded");
            Ok(config)
        }
        None => Ok(DispatchConfig { live_period_ms: DEMO_PERIOD_MS, ..DispatchConfig::default() }),
    }
}

/// Dispatch until the queue is empty or no rider is free.
fn dispatch_all(coord: &mut DispatchCoordinator<SimRng>) -> Result<usize> {
    let mut dispatched = 0;
    loop {
        match coord.process_next_recommended()? {
            DispatchOutcome::Dispatched(d) => {
                println!(
                    "  {:<8} -> {:<14} via {} ({} km, ETA {}){}",
                    d.parcel_id,
                    d.agent,
                    d.route.describe(coord.graph()),
                    d.route.distance,
                    d.eta,
                    if d.rerouted { " [rerouted]" } else { "" },
                );
                dispatched += 1;
            }
            DispatchOutcome::NoRouteAvailable { parcel_id, .. } => {
                println!("  {parcel_id:<8} returned to sender: no route");
            }
            DispatchOutcome::NoAgentAvailable { parcel_id } => {
                println!("  {parcel_id:<8} waiting: all riders busy");
                break;
            }
            DispatchOutcome::QueueEmpty => break,
        }
    }
    Ok(dispatched)
}

fn print_status(coord: &DispatchCoordinator<SimRng>) {
    println!("{:<8} {:<12} {:<22} {:<14} {:>8}", "Parcel", "Destination", "Status", "Rider", "Attempts");
    println!("{}", "-".repeat(68));
    for p in coord.parcels() {
        println!(
            "{:<8} {:<12} {:<22} {:<14} {:>8}",
            p.id(),
            p.destination(),
            p.status().label(),
            p.assigned_agent().unwrap_or("-"),
            p.delivery_attempts(),
        );
    }
    println!();
    for (status, count) in coord.parcels().status_counts() {
        println!("  {:<22} {count}", status.label());
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== hq: parcel dispatch engine ===");

    // 1. Configuration, network, roster.
    let config = load_config()?;
    let graph = default_network()?;
    let agents = default_roster()?;
    println!(
        "Network: {} cities, {} roads  |  Riders: {}  |  HQ: {}  |  Seed: {}",
        graph.city_count(),
        graph.road_count(),
        agents.len(),
        config.hq_city,
        config.seed,
    );
    println!();

    let rng = SimRng::new(config.seed);
    let mut coord = CoordinatorBuilder::new(config, graph, agents, rng).build()?;
    let session = Session::new("hq-admin");

    // 2. Quotes and submissions.
    println!("Submissions:");
    for (id, dest, weight, priority) in ORDERS {
        let request = ParcelRequest::new(id, dest, weight, priority);
        let quote = coord.submit_confirmed(request, &session)?;
        println!("  {id:<8} {dest:<12} {weight:>5.1} kg  {:>7.2} PKR  ({} km)", quote.cost, quote.distance);
    }
    let rejected = coord.submit_confirmed(ParcelRequest::new("PK-9999", "Gilgit", 1.0, 1), &session);
    if let Err(e) = rejected {
        println!("  PK-9999  rejected ({:?}): {e}", e.kind());
    }
    println!();

    // 3. Dispatch, then exercise the administrative actions.
    println!("Dispatch:");
    let n = dispatch_all(&mut coord)?;
    println!("  {n} parcels dispatched");
    println!();

    coord.report_missing("PK-1004", "customer reports no scan since pickup")?;
    if let Some(undone) = coord.undo_last()? {
        println!("Undo: {}", undone.action);
    }
    coord.set_road_blocked("Lahore", "Multan", true)?;
    println!("Road Lahore - Multan blocked for maintenance");
    println!();

    // 4. Live loop on a background thread, requests from this one.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let out = Path::new(OUTPUT_DIR);
    let mut observer = SnapshotObserver::new(CsvWriter::new(out)?)
        .with_snapshots(JsonSnapshotWriter::new(out.join("live_snapshot.json")), SNAPSHOT_EVERY);

    let shared = SharedCoordinator::new(coord);
    let cancel = CancelFlag::new();
    let live = {
        let shared = shared.clone();
        let cancel = cancel.clone();
        thread::spawn(move || {
            let summary = shared.run_live(&cancel, &mut observer, Some(LIVE_ITERATIONS));
            (summary, observer.take_error())
        })
    };

    let t0 = Instant::now();
    thread::sleep(Duration::from_millis(DEMO_PERIOD_MS * 20));
    shared.with(|c| -> Result<()> {
        c.set_road_blocked("Lahore", "Multan", false)?;
        c.submit_confirmed(ParcelRequest::new("PK-1009", "Hafizabad", 5.0, 3), &session)?;
        for r in c.resolve_investigations()? {
            match r.resolution {
                Resolution::Recovered => println!("Investigation {}: recovered", r.parcel_id),
                Resolution::Lost { compensation } => {
                    println!("Investigation {}: lost, compensation {compensation:.2} PKR", r.parcel_id)
                }
            }
        }
        println!("Dispatch (live):");
        dispatch_all(c)?;
        Ok(())
    })?;

    thread::sleep(Duration::from_millis(DEMO_PERIOD_MS * 60));
    cancel.cancel();

    let (summary, write_error) = live.join().map_err(|_| anyhow!("live loop thread panicked"))?;
    let summary = summary?;
    if let Some(e) = write_error {
        warn!(error = %e, "output error during live loop");
    }
    println!(
        "Live loop: {} iterations to {} in {:.2} s{}",
        summary.iterations,
        summary.final_tick,
        t0.elapsed().as_secs_f64(),
        if summary.cancelled { " (cancelled)" } else { "" },
    );
    println!();

    // 5. Final state and snapshot.
    let coord = shared.try_unwrap().map_err(|_| anyhow!("coordinator still shared"))?;
    print_status(&coord);

    let json = JsonSnapshotWriter::new(out.join("snapshot.json"));
    json.write(&Snapshot::capture(&coord.view()))?;
    println!();
    println!("Snapshot written to {}", json.path().display());

    Ok(())
}
