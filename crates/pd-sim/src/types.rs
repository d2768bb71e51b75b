//! Values exchanged with the coordinator's callers.

use pd_core::{CityId, Priority, Tick};
use pd_lifecycle::StatusChange;
use pd_queue::UndoAction;
use pd_spatial::Path;

// ── Session ───────────────────────────────────────────────────────────────────

/// Who is issuing a request.  Recorded in the parcel's history on creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: String,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    /// A session with no known user.
    pub fn anonymous() -> Self {
        Self::new("Unknown")
    }
}

// ── Submission ────────────────────────────────────────────────────────────────

/// An unvalidated parcel-creation request as received from the outer layer.
///
/// `priority` is the raw declared level; anything outside 1–3 is rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct ParcelRequest {
    pub id:          String,
    pub destination: String,
    pub weight:      f64,
    pub priority:    i64,
}

impl ParcelRequest {
    pub fn new(id: impl Into<String>, destination: impl Into<String>, weight: f64, priority: i64) -> Self {
        Self { id: id.into(), destination: destination.into(), weight, priority }
    }
}

/// Shipping quote for a validated request.
///
/// `distance` is the length of the shortest retained route from HQ, or 0
/// when the destination is currently unreachable (the parcel can still be
/// created; it is returned to sender when dispatched).
#[derive(Clone, Debug, PartialEq)]
pub struct Quote {
    pub parcel_id:   String,
    pub destination: String,
    pub weight:      f64,
    pub priority:    Priority,
    pub distance:    u32,
    pub cost:        f64,
    pub route:       Option<Path>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    /// The parcel was created and queued.
    Created(Quote),
    /// The confirmation callback declined; nothing was changed.
    Declined(Quote),
}

impl Submission {
    pub fn quote(&self) -> &Quote {
        match self {
            Submission::Created(q) | Submission::Declined(q) => q,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Submission::Created(_))
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// A committed dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatch {
    pub parcel_id:    String,
    pub agent:        String,
    pub route:        Path,
    /// Index of `route` in the candidate set it was chosen from.
    pub route_index:  usize,
    pub transit_secs: u32,
    pub eta:          Tick,
    /// A road was blocked at dispatch time and the route recomputed.
    pub rerouted:     bool,
    pub blocked_road: Option<(CityId, CityId)>,
}

/// Result of one `process_next` call.  None of these is an error.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome {
    Dispatched(Dispatch),
    /// Every agent is at capacity; the parcel went back into the queue.
    NoAgentAvailable { parcel_id: String },
    /// No unblocked route exists; the parcel was returned to sender.
    NoRouteAvailable {
        parcel_id:    String,
        blocked_road: Option<(CityId, CityId)>,
    },
    /// Nothing is waiting.
    QueueEmpty,
}

impl DispatchOutcome {
    pub fn dispatched(&self) -> Option<&Dispatch> {
        match self {
            DispatchOutcome::Dispatched(d) => Some(d),
            _ => None,
        }
    }
}

// ── Investigation ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Found; back in the warehouse and the queue.
    Recovered,
    /// Confirmed lost; `compensation` is owed to the customer.
    Lost { compensation: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct InvestigationResult {
    pub parcel_id:  String,
    pub resolution: Resolution,
}

// ── Undo ──────────────────────────────────────────────────────────────────────

/// Result of one `undo_last` call.
#[derive(Clone, Debug, PartialEq)]
pub struct UndoOutcome {
    pub action: UndoAction,
    /// `None` when the action no longer applied and was discarded.
    pub change: Option<StatusChange>,
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// What one `tick` call did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub tick:        Tick,
    pub transitions: Vec<StatusChange>,
    /// Parcels still in Loading / InTransit / DeliveryAttempt afterwards.
    pub active:      usize,
}
