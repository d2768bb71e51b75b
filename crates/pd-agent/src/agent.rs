//! A single delivery agent and its service tier.

use std::fmt;
use std::str::FromStr;

use crate::{AgentError, AgentResult};

/// Service tier.  Urgent parcels prefer `Express` agents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    #[default]
    Standard,
    Express,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Standard => "Standard",
            Tier::Express  => "Express",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = AgentError;

    /// Accepts the tier name (any case) or its numeric level (`1`, `2`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "1" => Ok(Tier::Standard),
            "express" | "2"  => Ok(Tier::Express),
            _ => Err(AgentError::UnknownTier(s.to_string())),
        }
    }
}

/// A rider with finite concurrent carrying capacity.
///
/// `load` is private so the `load <= capacity` invariant can only be changed
/// through [`AgentPool`](crate::AgentPool).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    name:     String,
    capacity: u32,
    load:     u32,
    tier:     Tier,
}

impl Agent {
    /// A new, idle agent.
    pub fn new(name: impl Into<String>, capacity: u32, tier: Tier) -> Self {
        Self { name: name.into(), capacity, load: 0, tier }
    }

    /// An agent carrying `load` parcels, e.g. when restoring a snapshot.
    pub fn with_load(name: impl Into<String>, capacity: u32, load: u32, tier: Tier) -> AgentResult<Self> {
        let name = name.into();
        if load > capacity {
            return Err(AgentError::Overloaded { name, load, capacity });
        }
        Ok(Self { name, capacity, load, tier })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn load(&self) -> u32 {
        self.load
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    #[inline]
    pub fn has_capacity(&self) -> bool {
        self.load < self.capacity
    }

    pub fn spare(&self) -> u32 {
        self.capacity - self.load
    }

    pub(crate) fn increment(&mut self) -> AgentResult<()> {
        if !self.has_capacity() {
            return Err(AgentError::AtCapacity { name: self.name.clone(), capacity: self.capacity });
        }
        self.load += 1;
        Ok(())
    }

    pub(crate) fn decrement(&mut self) {
        self.load = self.load.saturating_sub(1);
    }
}
