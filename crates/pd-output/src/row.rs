//! Plain data row types written by output backends.

use pd_core::Tick;
use pd_lifecycle::Parcel;

/// One parcel as observed at a given tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParcelStatusRow {
    pub tick:              u64,
    pub parcel_id:         String,
    /// Display label of the status ("In Transit", "Delivered", …).
    pub status:            String,
    /// Assigned agent; empty when none.
    pub agent:             String,
    pub delivery_attempts: u32,
    /// Seconds until the expected arrival, if dispatched.
    pub eta_remaining:     Option<u64>,
}

impl ParcelStatusRow {
    pub fn observe(parcel: &Parcel, now: Tick) -> Self {
        Self {
            tick:              now.0,
            parcel_id:         parcel.id().to_string(),
            status:            parcel.status().label().to_string(),
            agent:             parcel.assigned_agent().unwrap_or_default().to_string(),
            delivery_attempts: parcel.delivery_attempts(),
            eta_remaining:     parcel.eta_remaining(now),
        }
    }
}

/// Summary statistics for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:        u64,
    /// Lifecycle transitions applied during the tick.
    pub transitions: u64,
    /// Parcels in Loading / InTransit / DeliveryAttempt afterwards.
    pub active:      u64,
    /// Parcels waiting in the warehouse queue.
    pub pending:     u64,
}
