//! Spatial-subsystem error type.

use thiserror::Error;

use pd_core::CityId;

/// Errors produced by `pd-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("city {0} not found in graph")]
    CityNotFound(CityId),

    #[error("city named {0:?} not found in graph")]
    UnknownCity(String),

    #[error("city {0:?} already exists")]
    DuplicateCity(String),

    #[error("no road joins {u} and {v}")]
    RoadNotFound { u: CityId, v: CityId },

    #[error("a road cannot join {0} to itself")]
    SelfLoop(CityId),

    #[error("network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
