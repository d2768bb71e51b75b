//! The rotating agent pool.
//!
//! # Ring
//!
//! Agents are stored in a `Vec<Agent>` indexed by [`AgentId`] (insertion
//! order, stable).  A separate `VecDeque<AgentId>` is the logical ring:
//! rotating pops the front id and pushes it to the back.  Matching inspects
//! the front of the ring and rotates past agents that do not fit, so the
//! next search resumes where the last one stopped.
//!
//! # Matching
//!
//! [`AgentPool::find_available`] makes up to two full rotations:
//!
//! 1. Accept the first agent with spare capacity, except that an urgent
//!    parcel only accepts an `Express` agent.
//! 2. Accept the first agent with spare capacity, any tier.
//!
//! The matched agent is left at the front of the ring.  This is a greedy
//! heuristic with no global load-balancing guarantee: two consecutive
//! searches can return the same agent while it still has spare capacity.

use std::collections::{HashMap, VecDeque};

use pd_core::{AgentId, Priority};
use tracing::debug;

use crate::{Agent, AgentError, AgentResult, Tier};

#[derive(Clone, Debug, Default)]
pub struct AgentPool {
    agents:  Vec<Agent>,
    ring:    VecDeque<AgentId>,
    by_name: HashMap<String, AgentId>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Roster ────────────────────────────────────────────────────────────

    /// Append an agent to the back of the ring.
    pub fn push(&mut self, agent: Agent) -> AgentResult<AgentId> {
        if agent.name().is_empty() {
            return Err(AgentError::EmptyName);
        }
        if self.by_name.contains_key(agent.name()) {
            return Err(AgentError::Duplicate(agent.name().to_string()));
        }
        if agent.load() > agent.capacity() {
            return Err(AgentError::Overloaded {
                name:     agent.name().to_string(),
                load:     agent.load(),
                capacity: agent.capacity(),
            });
        }
        let id = AgentId::try_from(self.agents.len())
            .map_err(|_| AgentError::Parse("agent count exceeds u32".into()))?;
        self.by_name.insert(agent.name().to_string(), id);
        self.agents.push(agent);
        self.ring.push_back(id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.id_of(name).map(|id| &self.agents[id.index()])
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<AgentId> {
        self.by_name.get(name).copied()
    }

    /// Agents in current ring order (front first).
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.ring.iter().map(move |id| &self.agents[id.index()])
    }

    /// Sum of every agent's current load.
    pub fn total_load(&self) -> u32 {
        self.agents.iter().map(Agent::load).sum()
    }

    /// Sum of every agent's unused capacity.
    pub fn spare_capacity(&self) -> u32 {
        self.agents.iter().map(Agent::spare).sum()
    }

    // ── Ring ──────────────────────────────────────────────────────────────

    /// Move the front agent to the back of the ring.
    pub fn rotate(&mut self) {
        if let Some(id) = self.ring.pop_front() {
            self.ring.push_back(id);
        }
    }

    /// The agent at the front of the ring.
    pub fn peek(&self) -> Option<&Agent> {
        self.ring.front().map(|id| &self.agents[id.index()])
    }

    // ── Matching ──────────────────────────────────────────────────────────

    /// Find an agent with spare capacity for a parcel of `priority`.
    ///
    /// Returns `None` when every agent is at capacity.  See the module docs
    /// for the two-pass rule.  Rotates the ring as a side effect.
    pub fn find_available(&mut self, priority: Priority) -> Option<AgentId> {
        let strict = |a: &Agent| a.has_capacity() && (!priority.is_urgent() || a.tier() == Tier::Express);
        if let Some(id) = self.rotate_until(strict) {
            return Some(id);
        }
        debug!(%priority, "no tier match, accepting any agent with capacity");
        self.rotate_until(Agent::has_capacity)
    }

    /// One full rotation; stops with the first agent satisfying `accept` at
    /// the front of the ring.
    fn rotate_until(&mut self, accept: impl Fn(&Agent) -> bool) -> Option<AgentId> {
        for _ in 0..self.ring.len() {
            let id = *self.ring.front()?;
            if accept(&self.agents[id.index()]) {
                return Some(id);
            }
            self.rotate();
        }
        None
    }

    // ── Load accounting ───────────────────────────────────────────────────

    /// Increment the named agent's load.
    ///
    /// Fails with [`AgentError::AtCapacity`] rather than exceed capacity.
    pub fn assign(&mut self, name: &str) -> AgentResult<&Agent> {
        let id = self.require(name)?;
        let agent = &mut self.agents[id.index()];
        agent.increment()?;
        Ok(&*agent)
    }

    /// Decrement the named agent's load, never below zero.
    ///
    /// Returns the new load.
    pub fn release(&mut self, name: &str) -> AgentResult<u32> {
        let id = self.require(name)?;
        let agent = &mut self.agents[id.index()];
        agent.decrement();
        Ok(agent.load())
    }

    fn require(&self, name: &str) -> AgentResult<AgentId> {
        self.id_of(name).ok_or_else(|| AgentError::NotFound(name.to_string()))
    }
}
