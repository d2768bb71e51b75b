//! `pd-core` — foundational types for the parcel dispatch engine.
//!
//! This crate is a dependency of every other `pd-*` crate.  It intentionally
//! has no `pd-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `CityId`, `AgentId`, `ParcelKey`                      |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `DispatchConfig`, `Pricing`                           |
//! | [`rng`]         | `DispatchRng` trait, `SimRng`, `ScriptedRng`          |
//! | [`priority`]    | `Priority` (declared 1–3)                             |
//! | [`error`]       | `PdError`, `PdResult`, `ValidationError`              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by `pd-output` snapshots.                         |

pub mod config;
pub mod error;
pub mod ids;
pub mod priority;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DispatchConfig, Pricing};
pub use error::{PdError, PdResult, ValidationError};
pub use ids::{AgentId, CityId, ParcelKey};
pub use priority::Priority;
pub use rng::{DispatchRng, ScriptedRng, SimRng};
pub use time::{SimClock, Tick};
