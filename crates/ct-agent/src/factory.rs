//! Explicit agent construction.
//!
//! Every agent comes out of [`AgentFactory`]: the factory owns the id counter
//! (the deterministic part) and draws everything else from the run's shared
//! [`SimRng`].  Each call builds one fresh, independently owned `Agent`.
//!
//! # Usage
//!
//! ```rust
//! use ct_agent::AgentFactory;
//! use ct_core::{Millis, SimRng};
//!
//! let mut rng = SimRng::new(42);
//! let mut factory = AgentFactory::new();
//! let a = factory.make(&mut rng, Millis::ZERO, 0.75).unwrap();
//! let b = factory.make(&mut rng, Millis::ZERO, 0.75).unwrap();
//! assert_ne!(a.id, b.id);
//! ```

use ct_core::{AgentId, Millis, SimRng, Vec2};

use crate::{Agent, AgentError, AgentResult};

/// Allocates ids and builds randomly initialized agents.
///
/// `next_id` parks at [`AgentId::INVALID`] once the id space is used up.
#[derive(Debug, Clone)]
pub struct AgentFactory {
    next_id: AgentId,
}

impl AgentFactory {
    pub fn new() -> Self {
        Self { next_id: AgentId(0) }
    }

    /// Hand out the next unused id.
    pub fn allocate_id(&mut self) -> AgentResult<AgentId> {
        let id = self.next_id;
        if id == AgentId::INVALID {
            return Err(AgentError::IdsExhausted);
        }
        self.next_id = id.next().unwrap_or(AgentId::INVALID);
        Ok(id)
    }

    /// Make sure future ids come after `id` (used when agents were built
    /// outside the factory).
    pub fn resume_after(&mut self, id: AgentId) {
        let after = id.next().unwrap_or(AgentId::INVALID);
        self.next_id = self.next_id.max(after);
    }

    /// Ids handed out so far.
    pub fn allocated(&self) -> u32 {
        self.next_id.0
    }

    /// An agent somewhere in the unit square.  It starts with a random travel
    /// target with probability `travel_chance`.
    pub fn make(&mut self, rng: &mut SimRng, now: Millis, travel_chance: f64) -> AgentResult<Agent> {
        let id = self.allocate_id()?;
        let mut agent = Agent::new(id, rng.unit_point(), now);
        agent.travel_frequency = rng.unit();
        if rng.gen_bool(travel_chance) {
            agent.travel_target = Some(rng.unit_point());
        }
        Ok(agent)
    }

    /// An agent arriving from outside the visible square, already heading to
    /// a random target inside it.
    pub fn make_arrival(&mut self, rng: &mut SimRng, now: Millis) -> AgentResult<Agent> {
        let id = self.allocate_id()?;
        let position = Vec2::new(off_screen(rng), off_screen(rng));
        let mut agent = Agent::new(id, position, now);
        agent.travel_frequency = rng.unit();
        agent.travel_target = Some(rng.unit_point());
        Ok(agent)
    }
}

impl Default for AgentFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// A coordinate in `[-1, 0) ∪ [1, 2)`: one unit square off either edge.
fn off_screen(rng: &mut SimRng) -> f64 {
    let offset = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    rng.unit() + offset
}
