//! Framework error types.
//!
//! Sub-crates define their own error enums and either convert them into the
//! coordinator's error via `From` impls or wrap [`PdError`] as one variant.
//! [`ValidationError`] lives here because both the coordinator and the
//! snapshot restore path reject the same malformed parcel descriptors.

use thiserror::Error;

use crate::{AgentId, CityId};

/// Malformed input to a parcel-creation request.
///
/// Raised before any state is touched; the caller re-prompts and retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("weight must be greater than 0 (got {0})")]
    Weight(f64),

    #[error("priority must be 1 (low), 2 (medium) or 3 (urgent), got {0}")]
    Priority(i64),

    #[error("parcel id cannot be empty")]
    EmptyId,

    #[error("parcel id {0:?} already exists")]
    DuplicateId(String),

    #[error("destination {0:?} is not a known city")]
    UnknownDestination(String),
}

/// The top-level error type for `pd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PdError {
    #[error("city {0} not found")]
    CityNotFound(CityId),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `pd-*` crates.
pub type PdResult<T> = Result<T, PdError>;
