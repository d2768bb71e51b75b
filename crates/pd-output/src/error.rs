//! Error types for pd-output.

use thiserror::Error;

use pd_agent::AgentError;
use pd_lifecycle::LifecycleError;
use pd_sim::CoordinatorError;
use pd_spatial::SpatialError;

/// Errors that can occur when writing output or restoring a snapshot.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("snapshot road network is invalid: {0}")]
    Network(#[from] SpatialError),

    #[error("snapshot roster is invalid: {0}")]
    Roster(#[from] AgentError),

    #[error("snapshot parcels are invalid: {0}")]
    Parcels(#[from] LifecycleError),

    /// Agent loads disagree with the parcels assigned to them.
    #[error("snapshot is inconsistent: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
