//! Start / stop / restart lifecycle around a [`Sim`].

use log::info;

use ct_core::{EpiConfig, Millis, SimRng};
use ct_spatial::ContactDetector;

use crate::{Sim, SimBuilder, SimObserver, SimResult, TickSummary};

/// Owns at most one live [`Sim`] and replaces it on restart.
///
/// Every run gets a fresh world and its own seed derived from
/// `config.seed` and the run counter, so a restart never reuses state or
/// random draws from the previous run.  The detector is cloned per run.
pub struct SimHost<D: ContactDetector + Clone> {
    config:   EpiConfig,
    detector: D,
    sim:      Option<Sim<D>>,
    runs:     u64,
}

impl<D: ContactDetector + Clone> SimHost<D> {
    pub fn new(config: EpiConfig, detector: D) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config, detector, sim: None, runs: 0 })
    }

    /// Start a new run at host time `now`, stopping the current one first.
    pub fn start<O: SimObserver>(&mut self, now: Millis, observer: &mut O) -> SimResult<()> {
        self.stop(observer);

        let run_id = self.runs + 1;
        let config = EpiConfig {
            seed: SimRng::derive_seed(self.config.seed, self.runs),
            ..self.config.clone()
        };
        let sim = SimBuilder::new(config, self.detector.clone())
            .start_time(now)
            .run_id(run_id)
            .build()?;

        self.runs = run_id;
        self.sim = Some(sim);
        info!("started run {run_id} at {now}");
        Ok(())
    }

    /// Stop the current run, if any.  The stopped world stays readable
    /// through [`sim`](Self::sim) until the next start.
    pub fn stop<O: SimObserver>(&mut self, observer: &mut O) {
        if let Some(sim) = self.sim.as_mut() {
            sim.stop(observer);
        }
    }

    /// Process one tick of the current run.  `None` when nothing is running.
    pub fn tick<O: SimObserver>(&mut self, now: Millis, observer: &mut O) -> Option<TickSummary> {
        self.sim.as_mut()?.step_at(now, observer)
    }

    /// Run up to `n` frames of the current run on its own clock.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        match self.sim.as_mut() {
            Some(sim) => sim.run_ticks(n, observer),
            None => 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.sim.as_ref().is_some_and(Sim::is_running)
    }

    pub fn sim(&self) -> Option<&Sim<D>> {
        self.sim.as_ref()
    }

    /// Number of runs started so far; also the id of the latest run.
    pub fn runs(&self) -> u64 {
        self.runs
    }

    pub fn config(&self) -> &EpiConfig {
        &self.config
    }
}
