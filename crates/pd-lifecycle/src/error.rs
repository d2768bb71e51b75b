//! Lifecycle error type.

use thiserror::Error;

use pd_core::ValidationError;

use crate::ParcelStatus;

/// Errors produced by `pd-lifecycle`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LifecycleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("parcel {0:?} not found")]
    NotFound(String),

    #[error("parcel store cannot hold more than u32::MAX parcels")]
    StoreFull,

    #[error("parcel {id:?} cannot {transition} while {from}")]
    InvalidTransition {
        id:         String,
        from:       ParcelStatus,
        transition: &'static str,
    },
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
