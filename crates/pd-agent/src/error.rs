//! Agent-pool error type.

use thiserror::Error;

/// Errors produced by `pd-agent`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent {0:?} not found in pool")]
    NotFound(String),

    #[error("agent {0:?} already exists")]
    Duplicate(String),

    #[error("agent name must not be empty")]
    EmptyName,

    #[error("agent {name:?} is at capacity ({capacity})")]
    AtCapacity { name: String, capacity: u32 },

    #[error("agent {name:?} has load {load} above capacity {capacity}")]
    Overloaded { name: String, load: u32, capacity: u32 },

    #[error("unknown tier {0:?}: expected \"Standard\" or \"Express\"")]
    UnknownTier(String),

    #[error("roster parse error: {0}")]
    Parse(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
