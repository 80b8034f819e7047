//! Fluent builder for constructing a [`Sim`].

use log::info;

use ct_agent::{Agent, Population, PopulationManager};
use ct_core::{EpiConfig, Millis, SimClock, SimRng};
use ct_spatial::ContactDetector;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<D>`].
///
/// # Optional inputs (have defaults)
///
/// | Method             | Default                                        |
/// |--------------------|------------------------------------------------|
/// | `.start_time(t)`   | `Millis::ZERO`                                 |
/// | `.run_id(n)`       | `0`                                            |
/// | `.agents(v)`       | random cohort of `initial_agents` from config  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(EpiConfig::persistent_quarantine(), RTreeDetector::new())
///     .start_time(Millis(1_000))
///     .build()?;
/// sim.run_ticks(100, &mut NoopObserver);
/// ```
pub struct SimBuilder<D: ContactDetector> {
    config:   EpiConfig,
    detector: D,
    start:    Millis,
    run_id:   u64,
    agents:   Option<Vec<Agent>>,
}

impl<D: ContactDetector> SimBuilder<D> {
    pub fn new(config: EpiConfig, detector: D) -> Self {
        Self {
            config,
            detector,
            start:  Millis::ZERO,
            run_id: 0,
            agents: None,
        }
    }

    /// Host time at which the run begins.  All timers start here.
    pub fn start_time(mut self, start: Millis) -> Self {
        self.start = start;
        self
    }

    pub fn run_id(mut self, run_id: u64) -> Self {
        self.run_id = run_id;
        self
    }

    /// Start from exactly these agents instead of a random cohort.
    ///
    /// `initial_agents` and `initial_infections` are ignored; respawned
    /// agents get ids above the largest one given here, and none at all once
    /// those run out.  [`AgentId::INVALID`](ct_core::AgentId::INVALID) is
    /// rejected.
    pub fn agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Validate the configuration, populate the world and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<D>> {
        self.config.validate()?;

        let mut rng = SimRng::new(self.config.seed);
        let mut population = Population::new(self.config.max_population);
        let mut manager = PopulationManager::new();

        match self.agents {
            Some(agents) => {
                if agents.len() > self.config.max_population {
                    return Err(SimError::TooManyAgents {
                        got: agents.len(),
                        max: self.config.max_population,
                    });
                }
                for agent in agents {
                    manager.factory.resume_after(agent.id);
                    population.insert(agent)?;
                }
            }
            None => manager.seed_initial(&mut population, &self.config, &mut rng, self.start)?,
        }

        let had_spreader = population.has_spreader();
        let index_case = population.iter().find(|a| a.is_index_case).map(|a| a.id);
        info!(
            "run {} built: {} agents, {} spreading, seed {}",
            self.run_id,
            population.len(),
            population.count_where(Agent::is_spreading),
            self.config.seed,
        );

        Ok(Sim {
            clock: SimClock::new(self.start),
            config: self.config,
            population,
            manager,
            detector: self.detector,
            rng,
            run_id: self.run_id,
            index_case,
            had_spreader,
            pandemic_ended: false,
            running: true,
        })
    }
}
