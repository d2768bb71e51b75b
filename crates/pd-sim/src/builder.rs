//! Fluent builder for constructing a [`DispatchCoordinator`].

use std::collections::HashSet;

use pd_agent::AgentPool;
use pd_core::{DispatchConfig, DispatchRng, SimClock, Tick};
use pd_lifecycle::{ParcelStatus, ParcelStore};
use pd_queue::{PriorityDispatchQueue, UndoLog};
use pd_spatial::{DfsRouteFinder, RouteFinder, RouteGraph};
use tracing::info;

use crate::{CoordinatorError, CoordinatorResult, DispatchCoordinator};

/// Fluent builder for [`DispatchCoordinator<R, F>`].
///
/// # Required inputs
///
/// - [`DispatchConfig`]: HQ city, odds, durations, pricing
/// - [`RouteGraph`]: must contain the HQ city
/// - [`AgentPool`]: the delivery roster
/// - `R: DispatchRng`: the random source (e.g. [`pd_core::SimRng`])
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                         |
/// |------------------|---------------------------------|
/// | `.parcels(s)`    | empty `ParcelStore`             |
/// | `.clock(c)`      | `SimClock::new(0)` at tick 0    |
/// | `.start_at(t)`   | tick 0                          |
/// | `.finder(f)`     | `DfsRouteFinder`                |
///
/// Pre-existing parcels (from a snapshot) are re-indexed: those in
/// `Warehouse` are queued, those in Loading / InTransit / DeliveryAttempt
/// go on the active list.  The undo log always starts empty.
///
/// # Example
///
/// ```rust,ignore
/// let coord = CoordinatorBuilder::new(config, graph, agents, SimRng::new(7))
///     .start_at(Tick(3_600))
///     .build()?;
/// ```
pub struct CoordinatorBuilder<R: DispatchRng, F: RouteFinder = DfsRouteFinder> {
    config:  DispatchConfig,
    graph:   RouteGraph,
    agents:  AgentPool,
    rng:     R,
    finder:  F,
    parcels: Option<ParcelStore>,
    clock:   Option<SimClock>,
}

impl<R: DispatchRng> CoordinatorBuilder<R, DfsRouteFinder> {
    /// Create a builder with all required inputs.
    pub fn new(config: DispatchConfig, graph: RouteGraph, agents: AgentPool, rng: R) -> Self {
        Self {
            config,
            graph,
            agents,
            rng,
            finder:  DfsRouteFinder,
            parcels: None,
            clock:   None,
        }
    }
}

impl<R: DispatchRng, F: RouteFinder> CoordinatorBuilder<R, F> {
    /// Start from an existing parcel database.
    pub fn parcels(mut self, parcels: ParcelStore) -> Self {
        self.parcels = Some(parcels);
        self
    }

    pub fn clock(mut self, clock: SimClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Shorthand for a clock with Unix epoch 0 positioned at `tick`.
    pub fn start_at(mut self, tick: Tick) -> Self {
        let mut clock = self.clock.unwrap_or_else(|| SimClock::new(0));
        clock.current_tick = tick;
        self.clock = Some(clock);
        self
    }

    /// Replace the route-discovery strategy.
    pub fn finder<F2: RouteFinder>(self, finder: F2) -> CoordinatorBuilder<R, F2> {
        CoordinatorBuilder {
            config:  self.config,
            graph:   self.graph,
            agents:  self.agents,
            rng:     self.rng,
            finder,
            parcels: self.parcels,
            clock:   self.clock,
        }
    }

    /// Validate the configuration, resolve the HQ city, index any existing
    /// parcels, and return a ready coordinator.
    pub fn build(self) -> CoordinatorResult<DispatchCoordinator<R, F>> {
        self.config.validate()?;
        let hq = self.graph.city_by_name(&self.config.hq_city).ok_or_else(|| {
            CoordinatorError::Config(format!("hq city {:?} is not in the road graph", self.config.hq_city))
        })?;

        let parcels = self.parcels.unwrap_or_default();

        // ── Rebuild the queue and active list ─────────────────────────────
        let mut queue = PriorityDispatchQueue::new();
        let mut queued = HashSet::new();
        let mut active = Vec::new();
        for (key, parcel) in parcels.iter_keyed() {
            if parcel.status() == ParcelStatus::Warehouse {
                queue.insert(key, parcel.priority_score());
                queued.insert(key);
            } else if parcel.status().is_active() {
                active.push(key);
            }
        }

        info!(
            hq = %self.config.hq_city,
            cities = self.graph.city_count(),
            roads = self.graph.road_count(),
            agents = self.agents.len(),
            parcels = parcels.len(),
            queued = queue.len(),
            active = active.len(),
            "dispatch coordinator ready",
        );

        Ok(DispatchCoordinator {
            config: self.config,
            clock: self.clock.unwrap_or_else(|| SimClock::new(0)),
            hq,
            graph: self.graph,
            agents: self.agents,
            parcels,
            queue,
            queued,
            active,
            undo: UndoLog::new(),
            rng: self.rng,
            finder: self.finder,
        })
    }
}
