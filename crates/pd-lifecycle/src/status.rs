//! Parcel status, weight category, and the transition vocabulary.

use std::fmt;

use pd_core::Tick;

// ── ParcelStatus ──────────────────────────────────────────────────────────────

/// Where a parcel is in its lifecycle.
///
/// Declaration order is significant: `status <= Warehouse` means "not yet
/// dispatched", and [`code`](Self::code) follows the same order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParcelStatus {
    PickupQueue,
    Warehouse,
    Loading,
    InTransit,
    DeliveryAttempt,
    Delivered,
    Returned,
    Missing,
    Cancelled,
    UnderInvestigation,
}

impl ParcelStatus {
    pub const ALL: [ParcelStatus; 10] = [
        ParcelStatus::PickupQueue,
        ParcelStatus::Warehouse,
        ParcelStatus::Loading,
        ParcelStatus::InTransit,
        ParcelStatus::DeliveryAttempt,
        ParcelStatus::Delivered,
        ParcelStatus::Returned,
        ParcelStatus::Missing,
        ParcelStatus::Cancelled,
        ParcelStatus::UnderInvestigation,
    ];

    /// Stable numeric code (0–9) used by exports.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Delivered, Returned and Cancelled never change again on their own.
    pub fn is_terminal(self) -> bool {
        matches!(self, ParcelStatus::Delivered | ParcelStatus::Returned | ParcelStatus::Cancelled)
    }

    /// Statuses advanced by the per-tick lifecycle rules.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            ParcelStatus::Loading | ParcelStatus::InTransit | ParcelStatus::DeliveryAttempt
        )
    }

    /// Statuses that only an administrative action can move on.
    pub fn needs_attention(self) -> bool {
        matches!(self, ParcelStatus::Missing | ParcelStatus::UnderInvestigation)
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ParcelStatus::PickupQueue        => "Pickup Queue",
            ParcelStatus::Warehouse          => "Warehouse (Sorted)",
            ParcelStatus::Loading            => "Loading Vehicle",
            ParcelStatus::InTransit          => "In Transit",
            ParcelStatus::DeliveryAttempt    => "Out for Delivery",
            ParcelStatus::Delivered          => "Delivered",
            ParcelStatus::Returned           => "Returned to Sender",
            ParcelStatus::Missing            => "MISSING",
            ParcelStatus::Cancelled          => "Cancelled",
            ParcelStatus::UnderInvestigation => "Under Investigation",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── WeightCategory ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeightCategory {
    Light,
    Medium,
    Heavy,
}

impl WeightCategory {
    /// Under 5 kg is Light, under 20 kg Medium, otherwise Heavy.
    pub fn of(weight: f64) -> Self {
        if weight < 5.0 {
            WeightCategory::Light
        } else if weight < 20.0 {
            WeightCategory::Medium
        } else {
            WeightCategory::Heavy
        }
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WeightCategory::Light  => "Light",
            WeightCategory::Medium => "Medium",
            WeightCategory::Heavy  => "Heavy",
        })
    }
}

// ── Transition ────────────────────────────────────────────────────────────────

/// Every way a parcel's status may change.
///
/// | Transition          | From                              | To                 |
/// |---------------------|-----------------------------------|--------------------|
/// | `Promote`           | PickupQueue                       | Warehouse          |
/// | `Dispatch`          | Warehouse                         | Loading            |
/// | `Depart`            | Loading                           | InTransit          |
/// | `SignalLost`        | InTransit                         | Missing            |
/// | `Arrive`            | InTransit                         | DeliveryAttempt    |
/// | `Deliver`           | DeliveryAttempt                   | Delivered          |
/// | `Retry`             | DeliveryAttempt                   | InTransit          |
/// | `ReturnMaxAttempts` | DeliveryAttempt                   | Returned           |
/// | `NoRoute`           | Warehouse                         | Returned           |
/// | `BlockageReturn`    | Warehouse                         | Returned           |
/// | `ReportMissing`     | any                               | UnderInvestigation |
/// | `Recover`           | UnderInvestigation                | Warehouse          |
/// | `DeclareLost`       | UnderInvestigation                | Missing            |
/// | `Cancel`            | PickupQueue, Warehouse            | Cancelled          |
/// | `RevertCreate`      | any                               | Cancelled          |
/// | `RevertDispatch`    | any but PickupQueue               | Warehouse          |
#[derive(Clone, PartialEq, Debug)]
pub enum Transition {
    Promote,
    Dispatch { agent: String, arrival: Tick },
    Depart,
    SignalLost,
    Arrive,
    Deliver,
    Retry { arrival: Tick },
    ReturnMaxAttempts,
    NoRoute,
    BlockageReturn,
    ReportMissing { reason: String },
    Recover,
    DeclareLost,
    Cancel,
    RevertCreate,
    RevertDispatch,
}

impl Transition {
    /// Short verb used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Promote            => "promote",
            Transition::Dispatch { .. }    => "dispatch",
            Transition::Depart             => "depart",
            Transition::SignalLost         => "lose signal",
            Transition::Arrive             => "arrive",
            Transition::Deliver            => "deliver",
            Transition::Retry { .. }       => "retry",
            Transition::ReturnMaxAttempts  => "return after max attempts",
            Transition::NoRoute            => "return for lack of route",
            Transition::BlockageReturn     => "return after blockage",
            Transition::ReportMissing { .. } => "report missing",
            Transition::Recover            => "recover",
            Transition::DeclareLost        => "declare lost",
            Transition::Cancel             => "cancel",
            Transition::RevertCreate       => "revert creation",
            Transition::RevertDispatch     => "revert dispatch",
        }
    }

    /// `true` if this transition may be applied to a parcel in `from`.
    pub fn permits(&self, from: ParcelStatus) -> bool {
        use ParcelStatus as S;
        match self {
            Transition::Promote                 => from == S::PickupQueue,
            Transition::Dispatch { .. }         => from == S::Warehouse,
            Transition::Depart                  => from == S::Loading,
            Transition::SignalLost
            | Transition::Arrive                => from == S::InTransit,
            Transition::Deliver
            | Transition::Retry { .. }
            | Transition::ReturnMaxAttempts     => from == S::DeliveryAttempt,
            Transition::NoRoute
            | Transition::BlockageReturn        => from == S::Warehouse,
            Transition::ReportMissing { .. }    => true,
            Transition::Recover
            | Transition::DeclareLost           => from == S::UnderInvestigation,
            Transition::Cancel                  => from <= S::Warehouse,
            Transition::RevertCreate            => true,
            Transition::RevertDispatch          => from != S::PickupQueue,
        }
    }

    /// Status after the transition.
    pub fn target(&self) -> ParcelStatus {
        use ParcelStatus as S;
        match self {
            Transition::Promote                 => S::Warehouse,
            Transition::Dispatch { .. }         => S::Loading,
            Transition::Depart                  => S::InTransit,
            Transition::SignalLost              => S::Missing,
            Transition::Arrive                  => S::DeliveryAttempt,
            Transition::Deliver                 => S::Delivered,
            Transition::Retry { .. }            => S::InTransit,
            Transition::ReturnMaxAttempts
            | Transition::NoRoute
            | Transition::BlockageReturn        => S::Returned,
            Transition::ReportMissing { .. }    => S::UnderInvestigation,
            Transition::Recover                 => S::Warehouse,
            Transition::DeclareLost             => S::Missing,
            Transition::Cancel
            | Transition::RevertCreate          => S::Cancelled,
            Transition::RevertDispatch          => S::Warehouse,
        }
    }

    /// `true` if the parcel gives back its agent's load unit.
    pub fn releases_agent(&self) -> bool {
        matches!(
            self,
            Transition::SignalLost
                | Transition::Deliver
                | Transition::ReturnMaxAttempts
                | Transition::ReportMissing { .. }
                | Transition::RevertCreate
                | Transition::RevertDispatch
        )
    }
}
