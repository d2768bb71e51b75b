//! `pd-spatial` — city road graph and route discovery.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`graph`]  | `RouteGraph` (adjacency lists + blockable roads), `City`, `Edge`, `Road` |
//! | [`paths`]  | `RouteFinder` trait, `DfsRouteFinder`, `Path`, `RouteSet`    |
//! | [`loader`] | `load_network_csv`, `load_network_reader`                    |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod loader;
pub mod paths;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use graph::{City, Edge, Road, RouteGraph};
pub use loader::{load_network_csv, load_network_reader};
pub use paths::{DfsRouteFinder, Path, RouteFinder, RouteSet};
