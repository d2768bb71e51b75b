//! Tick-driven automatic transitions.
//!
//! | From            | Condition                                  | To              |
//! |-----------------|--------------------------------------------|-----------------|
//! | Loading         | `now >= last_update + loading_secs`        | InTransit       |
//! | InTransit       | signal-loss draw hits                      | Missing         |
//! | InTransit       | `now >= arrival` (and no signal loss)      | DeliveryAttempt |
//! | DeliveryAttempt | delivery draw hits                         | Delivered       |
//! | DeliveryAttempt | miss, `attempts + 1 < max_attempts`        | InTransit       |
//! | DeliveryAttempt | miss, `attempts + 1 >= max_attempts`       | Returned        |
//!
//! At most one rule fires per parcel per tick.  The signal-loss draw is made
//! on every tick a parcel spends in transit, so a longer journey carries a
//! higher cumulative risk.

use pd_core::{DispatchConfig, DispatchRng, Tick};
use tracing::{debug, warn};

use crate::{LifecycleResult, Parcel, ParcelStatus, StatusChange, Transition};

/// Apply the automatic rule for `parcel`'s status at `now`, if any.
///
/// Returns `Ok(None)` when nothing fires (including for every status that
/// is not active).
pub fn advance<R: DispatchRng + ?Sized>(
    parcel: &mut Parcel,
    now:    Tick,
    config: &DispatchConfig,
    rng:    &mut R,
) -> LifecycleResult<Option<StatusChange>> {
    let transition = match parcel.status() {
        ParcelStatus::Loading => {
            if now >= parcel.last_update() + config.loading_secs {
                Transition::Depart
            } else {
                return Ok(None);
            }
        }
        ParcelStatus::InTransit => {
            if rng.per_mille_hit(config.signal_loss_per_mille) {
                warn!(parcel = %parcel.id(), tick = %now, "signal lost in transit");
                Transition::SignalLost
            } else if parcel.arrival_time().is_none_or(|arrival| now >= arrival) {
                Transition::Arrive
            } else {
                return Ok(None);
            }
        }
        ParcelStatus::DeliveryAttempt => {
            if rng.percent_hit(config.delivery_success_percent) {
                Transition::Deliver
            } else if parcel.delivery_attempts() + 1 >= config.max_delivery_attempts {
                warn!(parcel = %parcel.id(), attempts = parcel.delivery_attempts() + 1, "returning to sender");
                Transition::ReturnMaxAttempts
            } else {
                Transition::Retry { arrival: now + config.retry_window_secs }
            }
        }
        _ => return Ok(None),
    };

    let change = parcel.apply(transition, now)?;
    debug!(parcel = %change.parcel_id, from = %change.from, to = %change.to, tick = %now, "lifecycle transition");
    Ok(Some(change))
}
