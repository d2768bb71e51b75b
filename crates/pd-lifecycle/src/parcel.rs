//! The parcel record.

use pd_core::{Priority, Tick, ValidationError};

use crate::{LifecycleError, LifecycleResult, ParcelStatus, Transition, WeightCategory};

// ── HistoryEvent ──────────────────────────────────────────────────────────────

/// One entry of a parcel's append-only tracking history.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEvent {
    pub description: String,
    pub location:    String,
    pub at:          Tick,
}

// ── StatusChange ──────────────────────────────────────────────────────────────

/// Result of applying a [`Transition`].
///
/// `released_agent` names the agent whose load the caller must decrement;
/// the parcel has already dropped its assignment.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusChange {
    pub parcel_id:      String,
    pub from:           ParcelStatus,
    pub to:             ParcelStatus,
    pub at:             Tick,
    pub released_agent: Option<String>,
}

// ── Parcel ────────────────────────────────────────────────────────────────────

/// A shipment request.
///
/// Identity, destination, weight, priority and the derived score and weight
/// category are fixed at creation.  `assigned_agent` is `Some` exactly while
/// the parcel holds one unit of that agent's load.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parcel {
    id:                String,
    destination:       String,
    weight:            f64,
    priority:          Priority,
    priority_score:    u32,
    weight_category:   WeightCategory,
    zone:              String,
    status:            ParcelStatus,
    assigned_agent:    Option<String>,
    delivery_attempts: u32,
    dispatch_time:     Option<Tick>,
    arrival_time:      Option<Tick>,
    last_update:       Tick,
    history:           Vec<HistoryEvent>,
}

impl Parcel {
    /// Create a parcel in `PickupQueue`.
    ///
    /// `weight` must be finite and positive; `id` must be non-empty.  The
    /// destination is not checked here (the graph owns city names).
    pub fn new(
        id:          impl Into<String>,
        destination: impl Into<String>,
        weight:      f64,
        priority:    Priority,
        zone:        impl Into<String>,
        now:         Tick,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ValidationError::Weight(weight));
        }
        let mut parcel = Self {
            id,
            destination:       destination.into(),
            weight,
            priority,
            priority_score:    Self::score(priority, weight),
            weight_category:   WeightCategory::of(weight),
            zone:              zone.into(),
            status:            ParcelStatus::PickupQueue,
            assigned_agent:    None,
            delivery_attempts: 0,
            dispatch_time:     None,
            arrival_time:      None,
            last_update:       now,
            history:           Vec::new(),
        };
        parcel.note("Pickup Request Created", "Customer Loc", now);
        Ok(parcel)
    }

    /// Heap key: `level * 1000 + floor(weight)`.
    pub fn score(priority: Priority, weight: f64) -> u32 {
        u32::from(priority.level()) * 1000 + weight.floor().clamp(0.0, u32::MAX as f64 / 2.0) as u32
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> &str { &self.id }
    pub fn destination(&self) -> &str { &self.destination }
    pub fn weight(&self) -> f64 { self.weight }
    pub fn priority(&self) -> Priority { self.priority }
    pub fn priority_score(&self) -> u32 { self.priority_score }
    pub fn weight_category(&self) -> WeightCategory { self.weight_category }
    pub fn zone(&self) -> &str { &self.zone }
    pub fn status(&self) -> ParcelStatus { self.status }
    pub fn assigned_agent(&self) -> Option<&str> { self.assigned_agent.as_deref() }
    pub fn delivery_attempts(&self) -> u32 { self.delivery_attempts }
    pub fn dispatch_time(&self) -> Option<Tick> { self.dispatch_time }
    pub fn arrival_time(&self) -> Option<Tick> { self.arrival_time }
    pub fn last_update(&self) -> Tick { self.last_update }
    pub fn history(&self) -> &[HistoryEvent] { &self.history }

    // ── Live monitoring ───────────────────────────────────────────────────

    /// Fraction of the dispatch → arrival window elapsed at `now`, in
    /// `[0, 1]`.  `None` if the parcel has no dispatch window.
    pub fn progress(&self, now: Tick) -> Option<f64> {
        let (start, end) = (self.dispatch_time?, self.arrival_time?);
        let total = end.since(start);
        if total == 0 {
            return Some(1.0);
        }
        Some((now.since(start) as f64 / total as f64).clamp(0.0, 1.0))
    }

    /// Seconds until the scheduled arrival (0 once it has passed).
    pub fn eta_remaining(&self, now: Tick) -> Option<u64> {
        self.arrival_time.map(|a| a.since(now))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append a history event without changing status.
    pub fn note(&mut self, description: impl Into<String>, location: impl Into<String>, now: Tick) {
        self.history.push(HistoryEvent {
            description: description.into(),
            location:    location.into(),
            at:          now,
        });
    }

    /// Apply `transition` at `now`.
    ///
    /// Fails without touching the parcel if the transition is not permitted
    /// from the current status.  On success exactly one history event is
    /// appended and `last_update` becomes `now`.
    pub fn apply(&mut self, transition: Transition, now: Tick) -> LifecycleResult<StatusChange> {
        let from = self.status;
        if !transition.permits(from) {
            return Err(LifecycleError::InvalidTransition {
                id:         self.id.clone(),
                from,
                transition: transition.name(),
            });
        }
        let to = transition.target();
        let released_agent = if transition.releases_agent() { self.assigned_agent.take() } else { None };

        let (description, location): (String, String) = match transition {
            Transition::Promote => ("Arrived at Warehouse".into(), "Central Hub".into()),
            Transition::Dispatch { agent, arrival } => {
                let description = format!("Loaded onto {agent}'s Vehicle");
                self.assigned_agent = Some(agent);
                self.dispatch_time = Some(now);
                self.arrival_time = Some(arrival);
                (description, "Warehouse".into())
            }
            Transition::Depart => ("Vehicle Departed".into(), "On Road".into()),
            Transition::SignalLost => ("Signal Lost - Investigation Started".into(), "Unknown".into()),
            Transition::Arrive => ("Arrived at Destination Hub".into(), self.destination.clone()),
            Transition::Deliver => ("Handed to Recipient".into(), "Doorstep".into()),
            Transition::Retry { arrival } => {
                self.delivery_attempts += 1;
                self.arrival_time = Some(arrival);
                ("Recipient Unavailable - Retrying".into(), "Local Hub".into())
            }
            Transition::ReturnMaxAttempts => {
                self.delivery_attempts += 1;
                ("Max Attempts Reached - RTS".into(), "Local Hub".into())
            }
            Transition::NoRoute => ("No Route Available".into(), "Warehouse".into()),
            Transition::BlockageReturn => ("Dynamic Blockage - RTS".into(), "Warehouse".into()),
            Transition::ReportMissing { reason } => (format!("Reported Missing: {reason}"), "Unknown".into()),
            Transition::Recover => ("Parcel Recovered - Returned to Warehouse".into(), "Warehouse".into()),
            Transition::DeclareLost => ("Investigation Concluded - DECLARED LOST".into(), "Unknown".into()),
            Transition::Cancel => ("Cancelled by User".into(), "Warehouse".into()),
            Transition::RevertCreate => ("Undo: Creation Reverted".into(), "N/A".into()),
            Transition::RevertDispatch => {
                self.dispatch_time = None;
                self.arrival_time = None;
                ("Undo: Dispatch Reverted".into(), "Warehouse".into())
            }
        };

        self.status = to;
        self.last_update = now;
        self.note(description, location, now);

        Ok(StatusChange { parcel_id: self.id.clone(), from, to, at: now, released_agent })
    }
}
