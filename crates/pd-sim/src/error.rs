//! Coordinator error type.
//!
//! Sub-crate errors convert in with `?`.  [`CoordinatorError::kind`] sorts
//! every error into the five categories a caller reacts to differently:
//! re-prompt (`Validation`), report (`NotFound`), retry later
//! (`ResourceExhausted`), refuse (`InvalidTransition`), or fix the setup
//! (`Config`).

use thiserror::Error;

use pd_agent::AgentError;
use pd_core::{PdError, ValidationError};
use pd_lifecycle::LifecycleError;
use pd_spatial::SpatialError;

/// Coarse error category.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    Validation,
    NotFound,
    ResourceExhausted,
    InvalidTransition,
    Config,
}

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("parcel {0:?} not found")]
    ParcelNotFound(String),

    #[error("coordinator configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] PdError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Lifecycle(LifecycleError),
}

impl From<LifecycleError> for CoordinatorError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::Validation(v) => CoordinatorError::Validation(v),
            LifecycleError::NotFound(id)  => CoordinatorError::ParcelNotFound(id),
            other                         => CoordinatorError::Lifecycle(other),
        }
    }
}

impl CoordinatorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoordinatorError::Validation(_)     => ErrorKind::Validation,
            CoordinatorError::ParcelNotFound(_) => ErrorKind::NotFound,
            CoordinatorError::Config(_)         => ErrorKind::Config,

            CoordinatorError::Core(e) => match e {
                PdError::Validation(_)                                => ErrorKind::Validation,
                PdError::CityNotFound(_) | PdError::AgentNotFound(_)  => ErrorKind::NotFound,
                PdError::Config(_) | PdError::Parse(_) | PdError::Io(_) => ErrorKind::Config,
            },

            CoordinatorError::Spatial(e) => match e {
                SpatialError::CityNotFound(_)
                | SpatialError::UnknownCity(_)
                | SpatialError::RoadNotFound { .. } => ErrorKind::NotFound,
                SpatialError::DuplicateCity(_) | SpatialError::SelfLoop(_) => ErrorKind::Validation,
                SpatialError::Parse(_) | SpatialError::Io(_) => ErrorKind::Config,
            },

            CoordinatorError::Agent(e) => match e {
                AgentError::NotFound(_)        => ErrorKind::NotFound,
                AgentError::AtCapacity { .. }  => ErrorKind::ResourceExhausted,
                AgentError::Duplicate(_)
                | AgentError::EmptyName
                | AgentError::Overloaded { .. }
                | AgentError::UnknownTier(_)   => ErrorKind::Validation,
                AgentError::Parse(_)           => ErrorKind::Config,
            },

            CoordinatorError::Lifecycle(e) => match e {
                LifecycleError::Validation(_)             => ErrorKind::Validation,
                LifecycleError::NotFound(_)               => ErrorKind::NotFound,
                LifecycleError::StoreFull                 => ErrorKind::ResourceExhausted,
                LifecycleError::InvalidTransition { .. }  => ErrorKind::InvalidTransition,
            },
        }
    }
}

pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
