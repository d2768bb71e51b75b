//! Engine configuration.
//!
//! Every constant the lifecycle rules, matching and pricing depend on lives
//! in [`DispatchConfig`].  `Default` reproduces the reference behaviour; an
//! application may load overrides from a JSON file (feature `serde`) and must
//! call [`DispatchConfig::validate`] before handing the config to the
//! coordinator builder.

use crate::{PdError, PdResult, Priority};

/// Quote formula constants.
///
/// ```text
/// cost = (base + weight * per_kg + distance * per_km) * multiplier(priority)
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pricing {
    pub base:              f64,
    pub per_kg:            f64,
    pub per_km:            f64,
    pub medium_multiplier: f64,
    pub urgent_multiplier: f64,
    /// Insurance factor applied to `base + weight * per_kg` when a parcel is
    /// declared lost.
    pub insurance_factor:  f64,
}

impl Pricing {
    /// Shipping quote for a parcel of `weight` kg over `distance` km.
    pub fn quote(&self, weight: f64, distance: f64, priority: Priority) -> f64 {
        let total = self.base + weight * self.per_kg + distance * self.per_km;
        match priority {
            Priority::Low    => total,
            Priority::Medium => total * self.medium_multiplier,
            Priority::Urgent => total * self.urgent_multiplier,
        }
    }

    /// Compensation owed for a parcel confirmed lost.
    pub fn compensation(&self, weight: f64) -> f64 {
        (self.base + weight * self.per_kg) * self.insurance_factor
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            base:              150.0,
            per_kg:            20.0,
            per_km:            0.5,
            medium_multiplier: 1.2,
            urgent_multiplier: 1.5,
            insurance_factor:  1.5,
        }
    }
}

/// Top-level engine configuration.
///
/// All durations are in logical seconds (one `Tick` unit).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Name of the hub every route starts from.
    pub hq_city: String,

    /// How many candidate routes path discovery retains.
    pub max_routes: usize,

    /// Time a parcel spends in `Loading` before departing.
    pub loading_secs: u64,

    /// Inclusive range the random transit duration is drawn from.
    pub transit_secs_min: u32,
    pub transit_secs_max: u32,

    /// Delay before the next delivery attempt after a failed one.
    pub retry_window_secs: u64,

    /// Failed attempts after which a parcel is returned to sender.
    pub max_delivery_attempts: u32,

    /// Per-tick odds (out of 1000) that an in-transit parcel loses signal.
    pub signal_loss_per_mille: u32,

    /// Odds (percent) that a delivery attempt succeeds.
    pub delivery_success_percent: u32,

    /// Odds (percent) of a simulated road blockage just before dispatch.
    pub blockage_percent: u32,

    /// Odds (percent) an investigated parcel is found.
    pub recovery_percent: u32,

    pub pricing: Pricing,

    /// Master RNG seed.  The same seed always replays the same session.
    pub seed: u64,

    /// Period of the live polling loop, in milliseconds of wall time.
    pub live_period_ms: u64,

    /// Logical seconds added per live-loop iteration.
    pub live_step_secs: u64,
}

impl DispatchConfig {
    /// Reject values that would make the lifecycle rules meaningless.
    pub fn validate(&self) -> PdResult<()> {
        if self.hq_city.trim().is_empty() {
            return Err(PdError::Config("hq_city must not be empty".into()));
        }
        if self.max_routes == 0 {
            return Err(PdError::Config("max_routes must be at least 1".into()));
        }
        if self.transit_secs_min > self.transit_secs_max {
            return Err(PdError::Config(format!(
                "transit range [{}, {}] is inverted",
                self.transit_secs_min, self.transit_secs_max
            )));
        }
        if self.max_delivery_attempts == 0 {
            return Err(PdError::Config("max_delivery_attempts must be at least 1".into()));
        }
        for (name, pct) in [
            ("delivery_success_percent", self.delivery_success_percent),
            ("blockage_percent", self.blockage_percent),
            ("recovery_percent", self.recovery_percent),
        ] {
            if pct > 100 {
                return Err(PdError::Config(format!("{name} must be ≤ 100, got {pct}")));
            }
        }
        if self.signal_loss_per_mille > 1000 {
            return Err(PdError::Config(format!(
                "signal_loss_per_mille must be ≤ 1000, got {}",
                self.signal_loss_per_mille
            )));
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            hq_city:                  "Lahore".to_string(),
            max_routes:               5,
            loading_secs:             5,
            transit_secs_min:         10,
            transit_secs_max:         30,
            retry_window_secs:        5,
            max_delivery_attempts:    3,
            signal_loss_per_mille:    1,
            delivery_success_percent: 80,
            blockage_percent:         20,
            recovery_percent:         30,
            pricing:                  Pricing::default(),
            seed:                     42,
            live_period_ms:           1_000,
            live_step_secs:           1,
        }
    }
}
