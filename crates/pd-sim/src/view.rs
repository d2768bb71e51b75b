//! Borrowed, read-only view of coordinator state for observers and exports.

use pd_agent::AgentPool;
use pd_core::{DispatchConfig, ParcelKey, Tick};
use pd_lifecycle::{Parcel, ParcelStatus, ParcelStore};
use pd_queue::PriorityDispatchQueue;
use pd_spatial::RouteGraph;

#[derive(Clone, Copy)]
pub struct DispatchView<'a> {
    pub now:     Tick,
    pub config:  &'a DispatchConfig,
    pub graph:   &'a RouteGraph,
    pub agents:  &'a AgentPool,
    pub parcels: &'a ParcelStore,
    pub queue:   &'a PriorityDispatchQueue,
    pub active:  &'a [ParcelKey],
}

impl<'a> DispatchView<'a> {
    /// Parcels currently on the active list.
    pub fn in_transit(&self) -> impl Iterator<Item = &'a Parcel> + 'a {
        let (parcels, active) = (self.parcels, self.active);
        active.iter().filter_map(move |&k| parcels.get_by_key(k))
    }

    /// Parcels waiting for dispatch, in the order they would be extracted.
    /// Stale entries are skipped.
    pub fn pending(&self) -> Vec<&'a Parcel> {
        let parcels = self.parcels;
        self.queue
            .ordered()
            .into_iter()
            .filter_map(|e| parcels.get_by_key(e.key))
            .filter(|p| p.status() == ParcelStatus::Warehouse)
            .collect()
    }
}
