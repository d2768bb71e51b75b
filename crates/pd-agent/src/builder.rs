//! Fluent builder for [`AgentPool`].
//!
//! # Usage
//!
//! ```rust
//! use pd_agent::{AgentPoolBuilder, Tier};
//!
//! let pool = AgentPoolBuilder::new()
//!     .agent("Ali Khan", 1, Tier::Standard)
//!     .agent("Asad Malik", 2, Tier::Express)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(pool.len(), 2);
//! assert_eq!(pool.spare_capacity(), 3);
//! ```

use crate::{Agent, AgentPool, AgentResult, Tier};

/// Collects agents in ring order; validation happens in [`build`](Self::build).
#[derive(Default)]
pub struct AgentPoolBuilder {
    agents: Vec<Agent>,
}

impl AgentPoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an idle agent at the back of the ring.
    pub fn agent(mut self, name: impl Into<String>, capacity: u32, tier: Tier) -> Self {
        self.agents.push(Agent::new(name, capacity, tier));
        self
    }

    /// Queue a pre-built agent (e.g. one restored with a non-zero load).
    pub fn with(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Construct the pool.
    ///
    /// Fails on the first empty or duplicate name, or overloaded agent.
    pub fn build(self) -> AgentResult<AgentPool> {
        let mut pool = AgentPool::new();
        for agent in self.agents {
            pool.push(agent)?;
        }
        Ok(pool)
    }
}
