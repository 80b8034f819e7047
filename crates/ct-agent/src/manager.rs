//! Population growth and shrinkage.
//!
//! [`PopulationManager`] is the only component that adds agents to or
//! removes agents from a [`Population`]:
//!
//! - **Initial cohort**: `initial_agents` random agents, `initial_infections`
//!   of them (distinct) infected at start.
//! - **Respawn**: at most one arrival per tick, only below the cap and only
//!   once `respawn_rate` has passed since the previous arrival.
//! - **Removal**: only quarantined agents whose quarantine outlived a finite
//!   `quarantine_lifetime`.

use log::debug;

use ct_core::{AgentId, EpiConfig, Millis, SimClock, SimRng};

use crate::{AgentFactory, AgentResult, Population};

/// Owns the [`AgentFactory`] and applies the growth/removal policy.
#[derive(Debug, Clone, Default)]
pub struct PopulationManager {
    pub factory: AgentFactory,
}

impl PopulationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill `population` with the initial cohort and infect some of it.
    pub fn seed_initial(
        &mut self,
        population: &mut Population,
        config:     &EpiConfig,
        rng:        &mut SimRng,
        now:        Millis,
    ) -> AgentResult<()> {
        let mut ids = Vec::with_capacity(config.initial_agents);
        for _ in 0..config.initial_agents {
            let agent = self.factory.make(rng, now, config.initial_travel_chance)?;
            ids.push(population.insert(agent)?);
        }

        rng.shuffle(&mut ids);
        for &id in ids.iter().take(config.initial_infections) {
            if let Some(agent) = population.get_mut(id) {
                agent.infect(now, None);
            }
        }
        debug!(
            "seeded {} agents ({} infected) at {now}",
            ids.len(),
            config.initial_infections.min(ids.len())
        );
        Ok(())
    }

    /// Admit one arriving agent if the population has room and the respawn
    /// interval has passed.  Updates `clock.last_respawn` on success.
    pub fn maybe_respawn(
        &mut self,
        population: &mut Population,
        config:     &EpiConfig,
        clock:      &mut SimClock,
        rng:        &mut SimRng,
    ) -> Option<AgentId> {
        if !population.has_room() || !clock.respawn_due(config.respawn_rate) {
            return None;
        }

        let now = clock.now;
        let mut agent = match self.factory.make_arrival(rng, now) {
            Ok(agent) => agent,
            Err(e) => {
                debug!("no respawn at {now}: {e}");
                return None;
            }
        };
        if rng.unit() < config.respawn_infection_rate {
            agent.infect(now, None);
        }
        let infected = agent.is_infected();

        // has_room() was checked above and ids are fresh, so this cannot fail.
        let id = population.insert(agent).ok()?;
        clock.last_respawn = now;
        debug!("respawned {id} at {now} (infected: {infected})");
        Some(id)
    }

    /// Remove `id` if it is quarantined and its quarantine has outlived the
    /// configured finite life.  Never touches a non-quarantined agent.
    pub fn remove_if_expired(
        &self,
        population: &mut Population,
        id:         AgentId,
        config:     &EpiConfig,
        now:        Millis,
    ) -> bool {
        let Some(life) = config.quarantine_lifetime.life() else {
            return false;
        };
        let expired = population
            .get(id)
            .and_then(|agent| agent.quarantine_elapsed(now))
            .is_some_and(|elapsed| elapsed > life);
        if expired {
            population.remove(id);
            debug!("removed {id} at {now}: quarantine life over");
        }
        expired
    }
}
