//! `pd-lifecycle` — parcels and the rules that move them.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`status`]     | `ParcelStatus`, `WeightCategory`, `Transition`             |
//! | [`parcel`]     | `Parcel`, `HistoryEvent`, `StatusChange`                   |
//! | [`lifecycle`]  | `advance`: the tick-driven automatic transitions           |
//! | [`store`]      | `ParcelStore`: the dispatch database (owns every parcel)   |
//! | [`error`]      | `LifecycleError`, `LifecycleResult<T>`                     |
//!
//! # State machine
//!
//! A parcel's status only changes through [`Parcel::apply`], which checks
//! the [`Transition`] against the current status, performs its side effects
//! (assignment, timestamps, attempt counter), and appends exactly one
//! history event.  There is no other setter.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on all public types.     |

pub mod error;
pub mod lifecycle;
pub mod parcel;
pub mod status;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{LifecycleError, LifecycleResult};
pub use lifecycle::advance;
pub use parcel::{HistoryEvent, Parcel, StatusChange};
pub use status::{ParcelStatus, Transition, WeightCategory};
pub use store::ParcelStore;
