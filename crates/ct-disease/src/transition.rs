//! One agent's health step, in tick order.

use log::info;

use ct_agent::Population;
use ct_core::{AgentId, EpiConfig, Millis, SimRng, TestingPolicy};
use ct_spatial::ContactDetector;

use crate::{TestResult, notify_contacts, per_agent_test, spread_from};

/// Everything one call to [`advance_agent`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AgentEvents {
    /// Agents this agent infected.
    pub infected: Vec<AgentId>,
    /// Whether this agent tested positive (per-agent policy only).
    pub tested_positive: bool,
    /// Agents this agent's notification put into quarantine.
    pub notified: Vec<AgentId>,
}

/// Run the health transitions of agent `id` at `now`:
///
/// 1. exposure of neighbours (if contagious),
/// 2. per-agent testing (if that policy is selected),
/// 3. contact notification (if quarantined long enough).
///
/// Removal is left to the caller and must run after this, so a pending
/// notification always fires before its agent can leave.  A missing `id`
/// is a no-op.
pub fn advance_agent<D: ContactDetector + ?Sized>(
    id:         AgentId,
    population: &mut Population,
    detector:   &D,
    config:     &EpiConfig,
    now:        Millis,
    rng:        &mut SimRng,
) -> AgentEvents {
    let mut events = AgentEvents::default();
    if !population.contains(id) {
        return events;
    }

    events.infected = spread_from(id, population, detector, config, now);

    if config.testing_policy == TestingPolicy::PerAgentProbabilistic {
        if let Some(agent) = population.get_mut(id) {
            if per_agent_test(agent, config, now, rng) == TestResult::Positive {
                info!("{id} tested positive at {now} with {} contacts", agent.contacts().len());
                events.tested_positive = true;
            }
        }
    }

    events.notified = notify_contacts(population, id, config, now);
    events
}
