//! Whole-engine snapshots.
//!
//! A [`Snapshot`] holds everything needed to rebuild a coordinator: cities,
//! roads with their blocked flags, the roster in rotation order with current
//! loads, every parcel with its full history, and the current tick.  Roads
//! and agents are stored by name so a snapshot file stays readable and
//! survives id renumbering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use pd_agent::{Agent, AgentPoolBuilder, Tier};
use pd_core::{DispatchConfig, DispatchRng, Tick};
use pd_lifecycle::{Parcel, ParcelStore};
use pd_sim::{CoordinatorBuilder, DispatchCoordinator, DispatchView};
use pd_spatial::RouteGraph;

use crate::{OutputError, OutputResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    pub zone: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadRecord {
    pub from:     String,
    pub to:       String,
    pub distance: u32,
    #[serde(default)]
    pub blocked:  bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name:     String,
    pub capacity: u32,
    pub load:     u32,
    pub tier:     Tier,
}

/// Serializable engine state.  See the module docs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick:    Tick,
    pub cities:  Vec<CityRecord>,
    /// In the order roads were added, so path discovery finds the same
    /// candidates after a restore.
    pub roads:   Vec<RoadRecord>,
    /// In rotation order, so restoring preserves whose turn it is.
    pub agents:  Vec<AgentRecord>,
    /// In creation order, so restoring preserves FIFO tie-breaking.
    pub parcels: Vec<Parcel>,
}

impl Snapshot {
    /// Copy the state visible through `view`.
    pub fn capture(view: &DispatchView<'_>) -> Self {
        let graph = view.graph;
        let name = |id| graph.city(id).map(|c| c.name.clone()).unwrap_or_default();

        Self {
            tick:    view.now,
            cities:  graph
                .cities()
                .iter()
                .map(|c| CityRecord { name: c.name.clone(), zone: c.zone.clone() })
                .collect(),
            roads:   graph
                .roads()
                .map(|r| RoadRecord { from: name(r.u), to: name(r.v), distance: r.distance, blocked: r.blocked })
                .collect(),
            agents:  view
                .agents
                .iter()
                .map(|a| AgentRecord {
                    name:     a.name().to_string(),
                    capacity: a.capacity(),
                    load:     a.load(),
                    tier:     a.tier(),
                })
                .collect(),
            parcels: view.parcels.iter().cloned().collect(),
        }
    }

    /// Rebuild the road graph.
    pub fn graph(&self) -> OutputResult<RouteGraph> {
        let mut graph = RouteGraph::new();
        for c in &self.cities {
            graph.add_city(c.name.as_str(), c.zone.as_str())?;
        }
        for r in &self.roads {
            graph.add_road_by_name(&r.from, &r.to, r.distance)?;
            if r.blocked {
                let (u, v) = (graph.require(&r.from)?, graph.require(&r.to)?);
                graph.set_blocked(u, v, true)?;
            }
        }
        Ok(graph)
    }

    /// Rebuild a coordinator from this snapshot.
    ///
    /// Fails if any agent's load differs from the number of parcels holding
    /// that agent, or a parcel holds an agent missing from the roster.
    /// Warehouse parcels are queued again and moving parcels put back on
    /// the active list; the undo log starts empty.
    pub fn restore<R: DispatchRng>(&self, config: DispatchConfig, rng: R) -> OutputResult<DispatchCoordinator<R>> {
        self.check_assignments()?;

        let graph = self.graph()?;
        let agents = self
            .agents
            .iter()
            .try_fold(AgentPoolBuilder::new(), |b, a| {
                Agent::with_load(a.name.as_str(), a.capacity, a.load, a.tier).map(|agent| b.with(agent))
            })?
            .build()?;

        let mut parcels = ParcelStore::new();
        for p in &self.parcels {
            parcels.insert(p.clone())?;
        }

        let coord = CoordinatorBuilder::new(config, graph, agents, rng)
            .parcels(parcels)
            .start_at(self.tick)
            .build()?;
        Ok(coord)
    }

    fn check_assignments(&self) -> OutputResult<()> {
        let mut held: HashMap<&str, u32> = HashMap::new();
        for p in &self.parcels {
            if let Some(agent) = p.assigned_agent() {
                *held.entry(agent).or_default() += 1;
            }
        }
        for a in &self.agents {
            let count = held.remove(a.name.as_str()).unwrap_or(0);
            if count != a.load {
                return Err(OutputError::Inconsistent(format!(
                    "agent {:?} has load {} but holds {} parcels",
                    a.name, a.load, count
                )));
            }
        }
        if let Some(name) = held.keys().next() {
            return Err(OutputError::Inconsistent(format!("parcels assigned to unknown agent {name:?}")));
        }
        Ok(())
    }
}
