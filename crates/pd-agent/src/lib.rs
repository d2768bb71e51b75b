//! `pd-agent` — the delivery-agent (rider) pool.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`agent`]   | `Agent`, `Tier`                                            |
//! | [`pool`]    | `AgentPool` (ring rotation, two-pass matching, load accounting) |
//! | [`builder`] | `AgentPoolBuilder` (fluent construction)                   |
//! | [`loader`]  | `load_roster_csv`, `load_roster_reader`                    |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Agent` and `Tier`.   |

pub mod agent;
pub mod builder;
pub mod error;
pub mod loader;
pub mod pool;


pub use agent::{Agent, Tier};
pub use builder::AgentPoolBuilder;
pub use error::{AgentError, AgentResult};
pub use loader::{load_roster_csv, load_roster_reader};
pub use pool::AgentPool;
