//! `Population`: the id-keyed agent collection.
//!
//! # Why a `BTreeMap`?
//!
//! Agents are added by respawn and removed when their quarantine expires,
//! while other agents keep referring to them by id in their contact lists.
//! A map keyed by `AgentId` gives O(log N) lookups that never shift when an
//! agent leaves, and a lookup of a departed id simply returns `None`.
//! Because ids are allocated in increasing order, key order is admission
//! order, which keeps iteration (and therefore every random draw made while
//! iterating) deterministic.
//!
//! The tick loop iterates over [`Population::ids`], a copy taken at tick
//! start, so insertions and removals mid-tick never skip or repeat an agent.

use std::collections::BTreeMap;

use ct_core::AgentId;

use crate::{Agent, AgentError, AgentResult};

/// Capacity-bounded collection of live agents.
#[derive(Debug, Clone)]
pub struct Population {
    agents:   BTreeMap<AgentId, Agent>,
    capacity: usize,
}

impl Population {
    /// An empty population that never holds more than `capacity` agents.
    pub fn new(capacity: usize) -> Self {
        Self { agents: BTreeMap::new(), capacity }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `true` while another agent may be admitted.
    #[inline]
    pub fn has_room(&self) -> bool {
        self.agents.len() < self.capacity
    }

    /// Admit `agent`.  Fails without side effects if the population is full
    /// or the id is already present.
    pub fn insert(&mut self, agent: Agent) -> AgentResult<AgentId> {
        if !self.has_room() {
            return Err(AgentError::AtCapacity { capacity: self.capacity });
        }
        let id = agent.id;
        if id == AgentId::INVALID {
            return Err(AgentError::InvalidId(id));
        }
        if self.agents.contains_key(&id) {
            return Err(AgentError::DuplicateId(id));
        }
        self.agents.insert(id, agent);
        Ok(id)
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    /// Copy of all live ids in ascending order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    /// Agents in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> + '_ {
        self.agents.values_mut()
    }

    /// Number of agents matching `pred`.
    pub fn count_where(&self, pred: impl Fn(&Agent) -> bool) -> usize {
        self.agents.values().filter(|a| pred(a)).count()
    }

    /// `true` while at least one agent is infected and not quarantined.
    pub fn has_spreader(&self) -> bool {
        self.agents.values().any(Agent::is_spreading)
    }
}
