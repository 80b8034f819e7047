//! The `Sim` struct and its tick loop.

use log::{debug, info};

use ct_agent::{Population, PopulationManager};
use ct_core::{AgentId, EpiConfig, Millis, SimClock, SimRng, TestingPolicy};
use ct_disease::{TestResult, advance_agent, global_random_test, step_movement};
use ct_spatial::ContactDetector;

use crate::{SimObserver, TickSummary, WorldSnapshot};

/// The main simulation runner.
///
/// `Sim<D>` owns every piece of run state and drives the tick loop described
/// in the [crate docs](crate).  Time is supplied by the caller through
/// [`step_at`](Self::step_at); [`run_ticks`](Self::run_ticks) drives its own
/// clock in `frame_millis` steps instead.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<D: ContactDetector> {
    pub config: EpiConfig,

    /// Loop timers: current time, last tick, last respawn, last global test.
    pub clock: SimClock,

    /// Every live agent, keyed by id.
    pub population: Population,

    /// Initial cohort, respawn and removal.  Owns the id counter.
    pub manager: PopulationManager,

    /// Answers "who is close enough to catch it" for each spreader.
    pub detector: D,

    /// The run's only source of randomness.
    pub rng: SimRng,

    /// Distinguishes runs of the same host; stamped on every snapshot.
    pub run_id: u64,

    pub(crate) index_case: Option<AgentId>,
    pub(crate) had_spreader: bool,
    pub(crate) pandemic_ended: bool,
    pub(crate) running: bool,
}

impl<D: ContactDetector> Sim<D> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Process one tick at host time `now`.
    ///
    /// Returns `None` once the run is stopped; the world is left untouched.
    /// A `now` earlier than the previous tick is treated as no time passing.
    pub fn step_at<O: SimObserver>(&mut self, now: Millis, observer: &mut O) -> Option<TickSummary> {
        if !self.running {
            return None;
        }
        let elapsed = self.clock.advance(now);
        let now = self.clock.now;
        observer.on_tick_start(now);

        let mut summary = TickSummary {
            run_id: self.run_id,
            tick: self.clock.ticks,
            time: now,
            elapsed,
            ..TickSummary::default()
        };
        self.process_tick(now, elapsed, &mut summary);

        // ── End of pandemic ───────────────────────────────────────────────
        if self.population.has_spreader() {
            self.had_spreader = true;
        } else if self.had_spreader && !self.pandemic_ended {
            self.pandemic_ended = true;
            summary.pandemic_ended = true;
            info!("run {}: no spreaders left at {now}", self.run_id);
        }

        if observer.wants_snapshot() {
            observer.on_snapshot(&self.snapshot());
        }
        if summary.pandemic_ended {
            observer.on_pandemic_end(now);
        }
        summary.tally(&self.population);
        observer.on_tick_end(&summary);
        Some(summary)
    }

    /// Advance the clock by `frame_millis` and process one tick.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> Option<TickSummary> {
        let now = self.clock.now + self.config.frame_millis;
        self.step_at(now, observer)
    }

    /// Run up to `n` ticks of `frame_millis` each.  Returns how many ran
    /// (fewer than `n` only if the run was stopped).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> u64 {
        let mut ran = 0;
        for _ in 0..n {
            if self.step(observer).is_none() {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Step until the pandemic ends or `max_ticks` have run.  Returns the
    /// time the pandemic ended, if it did.
    pub fn run_until_contained<O: SimObserver>(
        &mut self,
        max_ticks: u64,
        observer:  &mut O,
    ) -> Option<Millis> {
        for _ in 0..max_ticks {
            let summary = self.step(observer)?;
            if summary.pandemic_ended {
                return Some(summary.time);
            }
        }
        None
    }

    /// A read-only view of the world as of the last tick.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(
            &self.population,
            &self.config,
            self.run_id,
            self.clock.ticks,
            self.clock.now,
            self.pandemic_ended,
        )
    }

    /// Stop the run.  Later ticks are no-ops.  Calling it twice is harmless.
    pub fn stop<O: SimObserver>(&mut self, observer: &mut O) {
        if !self.running {
            return;
        }
        self.running = false;
        info!("run {} stopped at {} after {} ticks", self.run_id, self.clock.now, self.clock.ticks);
        observer.on_stop(self.clock.now);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the end-of-pandemic event has fired in this run.
    pub fn has_ended(&self) -> bool {
        self.pandemic_ended
    }

    /// The first agent that tested positive in this run.
    pub fn index_case(&self) -> Option<AgentId> {
        self.index_case
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Millis, elapsed: Millis, summary: &mut TickSummary) {
        // ── Phase 1: respawn ──────────────────────────────────────────────
        if self
            .manager
            .maybe_respawn(&mut self.population, &self.config, &mut self.clock, &mut self.rng)
            .is_some()
        {
            summary.spawned += 1;
        }

        // ── Phase 2: global random single test ────────────────────────────
        if self.config.testing_policy == TestingPolicy::GlobalRandomSingle {
            if let Some((_, TestResult::Positive)) = global_random_test(
                &mut self.population,
                &self.config,
                &mut self.clock,
                &mut self.rng,
                &mut self.index_case,
            ) {
                summary.tested_positive += 1;
            }
        }

        // Both passes walk this list, so agents added or removed below are
        // neither skipped nor visited twice.
        let ids = self.population.ids();

        // ── Phase 3: movement ─────────────────────────────────────────────
        for &id in &ids {
            if let Some(agent) = self.population.get_mut(id) {
                step_movement(agent, &self.config, now, elapsed, &mut self.rng);
            }
        }

        // ── Phase 4: contact index on the moved positions ─────────────────
        self.detector.prepare(&self.population);

        // ── Phase 5: health transitions, then removal ─────────────────────
        for &id in &ids {
            let events = advance_agent(
                id,
                &mut self.population,
                &self.detector,
                &self.config,
                now,
                &mut self.rng,
            );
            summary.new_infections += events.infected.len();
            summary.notified += events.notified.len();
            if events.tested_positive {
                summary.tested_positive += 1;
                if self.index_case.is_none() {
                    self.index_case = Some(id);
                }
            }

            if self.manager.remove_if_expired(&mut self.population, id, &self.config, now) {
                summary.removed += 1;
            }
        }

        debug!(
            "tick {} at {now}: +{} infected, +{} positive, +{} notified, -{} removed",
            summary.tick, summary.new_infections, summary.tested_positive, summary.notified, summary.removed,
        );
    }
}
