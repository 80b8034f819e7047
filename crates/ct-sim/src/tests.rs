//! Integration tests for ct-sim.

use ct_agent::Agent;
use ct_core::{AgentId, EpiConfig, Millis, QuarantineLifetime, TestingPolicy, Vec2};
use ct_disease::HealthState;
use ct_spatial::{BruteForceDetector, RTreeDetector};

use crate::{NoopObserver, Sim, SimBuilder, SimObserver, TickSummary, WorldSnapshot};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// No respawn, certain tests, no idle agent ever departs.
fn quiet_config() -> EpiConfig {
    EpiConfig {
        respawn_rate:           Millis(1_000_000_000),
        respawn_infection_rate: 0.0,
        max_population:         8,
        initial_agents:         2,
        initial_infections:     1,
        test_probability:       1.0,
        ..EpiConfig::finite_quarantine()
    }
}

fn at(id: u32, x: f64, y: f64) -> Agent {
    Agent::new(AgentId(id), Vec2::new(x, y), Millis::ZERO)
}

/// Agent 0 infected at t=0, agent 1 susceptible right next to it.
fn pair() -> Vec<Agent> {
    let mut zero = at(0, 0.5, 0.5);
    zero.infect(Millis::ZERO, None);
    vec![zero, at(1, 0.51, 0.5)]
}

fn build(config: EpiConfig, agents: Vec<Agent>) -> Sim<BruteForceDetector> {
    SimBuilder::new(config, BruteForceDetector)
        .agents(agents)
        .build()
        .unwrap()
}

fn state(sim: &Sim<BruteForceDetector>, id: u32) -> Option<HealthState> {
    sim.population.get(AgentId(id)).map(HealthState::of)
}

/// A quarantine nobody else started must follow the agent's own infection;
/// a notified agent may never have been infected at all.
fn assert_quarantine_consistent(agent: &Agent) {
    let Some(q) = agent.quarantined_at() else {
        assert!(!agent.is_index_case, "{} is an index case but not quarantined", agent.id);
        return;
    };
    match agent.quarantined_by() {
        Some(by) => assert_ne!(by, agent.id),
        None => assert!(
            agent.infected_at().is_some_and(|i| i <= q),
            "{} quarantined at {q} before any infection",
            agent.id
        ),
    }
}

#[derive(Default)]
struct Recorder {
    starts:    usize,
    summaries: Vec<TickSummary>,
    last:      Option<WorldSnapshot>,
    ended:     Vec<Millis>,
    stops:     usize,
}

impl SimObserver for Recorder {
    fn on_tick_start(&mut self, _time: Millis) {
        self.starts += 1;
    }
    fn on_snapshot(&mut self, snapshot: &WorldSnapshot) {
        self.last = Some(snapshot.clone());
    }
    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(summary.clone());
    }
    fn on_pandemic_end(&mut self, time: Millis) {
        self.ended.push(time);
    }
    fn on_stop(&mut self, _time: Millis) {
        self.stops += 1;
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::SimError;

    #[test]
    fn random_cohort_matches_config() {
        let cfg = EpiConfig::default();
        let sim = SimBuilder::new(cfg.clone(), BruteForceDetector).build().unwrap();
        assert_eq!(sim.population.len(), cfg.initial_agents);
        assert_eq!(
            sim.population.count_where(Agent::is_infected),
            cfg.initial_infections
        );
        assert!(sim.is_running());
        assert_eq!(sim.clock.ticks, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = EpiConfig { test_probability: 1.5, ..EpiConfig::default() };
        let err = SimBuilder::new(cfg, BruteForceDetector).build();
        assert!(matches!(err, Err(SimError::Config(_))));
    }

    #[test]
    fn too_many_agents_is_rejected() {
        let cfg = EpiConfig { max_population: 1, initial_agents: 1, ..quiet_config() };
        let err = SimBuilder::new(cfg, BruteForceDetector).agents(pair()).build();
        assert!(matches!(err, Err(SimError::TooManyAgents { got: 2, max: 1 })));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SimBuilder::new(quiet_config(), BruteForceDetector)
            .agents(vec![at(3, 0.1, 0.1), at(3, 0.9, 0.9)])
            .build();
        assert!(matches!(err, Err(SimError::Agent(_))));
    }

    #[test]
    fn respawned_ids_follow_explicit_agents() {
        let cfg = EpiConfig { respawn_rate: Millis::ZERO, ..quiet_config() };
        let mut sim = build(cfg, vec![at(5, 0.1, 0.1), at(9, 0.9, 0.9)]);
        let summary = sim.step_at(Millis(16), &mut NoopObserver).unwrap();
        assert_eq!(summary.spawned, 1);
        assert!(sim.population.contains(AgentId(10)));
    }

    #[test]
    fn sentinel_id_is_rejected() {
        let err = SimBuilder::new(quiet_config(), BruteForceDetector)
            .agents(vec![at(u32::MAX, 0.5, 0.5)])
            .build();
        assert!(matches!(err, Err(SimError::Agent(_))));
    }

    #[test]
    fn respawn_stops_when_ids_run_out() {
        let cfg = EpiConfig { respawn_rate: Millis::ZERO, ..quiet_config() };
        let mut sim = build(cfg, vec![at(u32::MAX - 1, 0.5, 0.5)]);
        for t in [16, 32, 48] {
            let summary = sim.step_at(Millis(t), &mut NoopObserver).unwrap();
            assert_eq!(summary.spawned, 0);
        }
        assert_eq!(sim.population.ids(), vec![AgentId(u32::MAX - 1)]);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn quarantine_chain_with_finite_lifetime() {
        let mut sim = build(quiet_config(), pair());
        let mut obs = Recorder::default();

        // Still incubating.
        let s = sim.step_at(Millis(16), &mut obs).unwrap();
        assert_eq!(s.new_infections, 0);

        let s = sim.step_at(Millis(501), &mut obs).unwrap();
        assert_eq!(s.new_infections, 1);
        assert_eq!(state(&sim, 1), Some(HealthState::Infectious));
        assert_eq!(sim.population.get(AgentId(1)).unwrap().infected_by(), Some(AgentId(0)));
        let snap = obs.last.as_ref().unwrap();
        assert_eq!(snap.edges.len(), 1);
        assert_eq!(snap.edges[0].from, AgentId(0));
        assert_eq!(snap.edges[0].to, AgentId(1));

        // Agent 0 tests positive; agent 1 has nobody to have infected.
        let s = sim.step_at(Millis(3_501), &mut obs).unwrap();
        assert_eq!(s.tested_positive, 1);
        assert_eq!(sim.index_case(), Some(AgentId(0)));
        assert_eq!(state(&sim, 0), Some(HealthState::Quarantined));
        assert_eq!(state(&sim, 1), Some(HealthState::Infectious));
        assert!(obs.last.as_ref().unwrap().agents[0].is_index_case);

        // Notification delay passed: the contact is quarantined, nobody spreads.
        let s = sim.step_at(Millis(4_502), &mut obs).unwrap();
        assert_eq!(s.notified, 1);
        assert!(s.pandemic_ended);
        assert_eq!(sim.population.get(AgentId(1)).unwrap().quarantined_by(), Some(AgentId(0)));
        assert_eq!(obs.ended, vec![Millis(4_502)]);

        sim.step_at(Millis(5_001), &mut obs).unwrap();
        let snap = obs.last.as_ref().unwrap();
        assert_relative_eq!(snap.agents[0].opacity, 0.5, epsilon = 1e-4);
        assert_relative_eq!(snap.agents[0].quarantine_progress.unwrap(), 0.5, epsilon = 1e-4);
        assert!(snap.pandemic_ended);

        // Quarantine life is 3000 ms; removal needs strictly more.
        let s = sim.step_at(Millis(6_501), &mut obs).unwrap();
        assert_eq!(s.removed, 0);
        let s = sim.step_at(Millis(6_502), &mut obs).unwrap();
        assert_eq!(s.removed, 1);
        assert_eq!(state(&sim, 0), None);
        assert_eq!(state(&sim, 1), Some(HealthState::Quarantined));

        let s = sim.step_at(Millis(7_503), &mut obs).unwrap();
        assert_eq!(s.removed, 1);
        assert!(sim.population.is_empty());
        assert_eq!(obs.ended.len(), 1);
    }

    #[test]
    fn notification_fires_before_removal() {
        let cfg = EpiConfig {
            quarantine_lifetime: QuarantineLifetime::Finite(Millis(500)),
            ..quiet_config()
        };
        let mut sim = build(cfg, pair());
        sim.step_at(Millis(501), &mut NoopObserver).unwrap();
        sim.step_at(Millis(3_501), &mut NoopObserver).unwrap();
        assert_eq!(state(&sim, 0), Some(HealthState::Quarantined));

        // Both due in the same tick: notify first, then leave.
        let s = sim.step_at(Millis(5_000), &mut NoopObserver).unwrap();
        assert_eq!(s.notified, 1);
        assert_eq!(s.removed, 1);
        assert_eq!(state(&sim, 0), None);
        assert_eq!(state(&sim, 1), Some(HealthState::Quarantined));
    }

    /// 0 infected 1, 1 infected 2, and 1 is already quarantined.
    fn chain() -> Vec<Agent> {
        let mut zero = at(0, 0.1, 0.1);
        zero.infect(Millis::ZERO, None);
        zero.add_contact(AgentId(1));
        let mut one = at(1, 0.5, 0.5);
        one.infect(Millis::ZERO, Some(AgentId(0)));
        one.add_contact(AgentId(2));
        one.quarantine(Millis::ZERO, None);
        let mut two = at(2, 0.9, 0.9);
        two.infect(Millis::ZERO, Some(AgentId(1)));
        vec![zero, one, two]
    }

    #[test]
    fn notification_reaches_the_infector() {
        let mut sim = build(quiet_config(), chain());
        let mut obs = Recorder::default();

        let s = sim.step_at(Millis(1_001), &mut obs).unwrap();
        assert_eq!(s.notified, 2);
        for id in [0, 2] {
            let agent = sim.population.get(AgentId(id)).unwrap();
            assert_eq!(agent.quarantined_by(), Some(AgentId(1)));
            assert_eq!(agent.quarantined_at(), Some(Millis(1_001)));
            assert!(agent.is_infected());
            assert!(!agent.is_index_case);
        }
        assert!(!sim.population.has_spreader());
        assert_eq!(obs.ended, vec![Millis(1_001)]);
    }

    #[test]
    fn infector_keeps_spreading_when_disabled() {
        let cfg = EpiConfig { notify_infector: false, ..quiet_config() };
        let mut sim = build(cfg, chain());
        let s = sim.step_at(Millis(1_001), &mut NoopObserver).unwrap();
        assert_eq!(s.notified, 1);
        assert_eq!(state(&sim, 0), Some(HealthState::Infectious));
        assert_eq!(state(&sim, 2), Some(HealthState::Quarantined));
        assert!(!sim.has_ended());
    }

    #[test]
    fn persistent_profile_tests_one_agent_at_a_time() {
        let cfg = EpiConfig {
            respawn_rate:           Millis(1_000_000_000),
            respawn_infection_rate: 0.0,
            max_population:         8,
            initial_agents:         2,
            initial_infections:     1,
            ..EpiConfig::persistent_quarantine()
        };
        assert_eq!(cfg.testing_policy, TestingPolicy::GlobalRandomSingle);

        let mut zero = at(0, 0.5, 0.5);
        zero.infect(Millis::ZERO, None);
        zero.add_contact(AgentId(1));
        let mut one = at(1, 0.9, 0.1);
        one.infect(Millis::ZERO, Some(AgentId(0)));
        let mut sim = build(cfg.clone(), vec![zero, one]);

        let mut obs = Recorder::default();
        let ended = sim.run_until_contained(20_000, &mut obs);
        assert!(ended.is_some());
        assert_eq!(sim.index_case(), Some(AgentId(0)));
        assert_eq!(sim.population.get(AgentId(1)).unwrap().quarantined_by(), Some(AgentId(0)));
        assert!(!sim.population.get(AgentId(1)).unwrap().is_index_case);

        // Nobody ever leaves; quarantined agents draw at the fixed opacity.
        sim.run_ticks(500, &mut obs);
        assert_eq!(sim.population.len(), 2);
        let snap = obs.last.as_ref().unwrap();
        assert_eq!(snap.count(HealthState::Quarantined), 2);
        for view in &snap.agents {
            assert_relative_eq!(view.opacity, cfg.quarantined_opacity);
            assert!(view.quarantine_progress.is_none());
        }
        assert_eq!(obs.ended.len(), 1);
    }

    #[test]
    fn pandemic_end_fires_once_even_if_infection_returns() {
        let cfg = EpiConfig {
            respawn_rate:           Millis(100),
            respawn_infection_rate: 1.0,
            max_population:         2,
            ..quiet_config()
        };
        let mut sim = build(cfg, pair());
        let mut obs = Recorder::default();
        for t in [501, 3_501, 4_502] {
            sim.step_at(Millis(t), &mut obs);
        }
        assert_eq!(obs.ended.len(), 1);
        assert!(sim.has_ended());

        // Agent 0 leaves at 6502, making room for an infected arrival.  The
        // world has a spreader again but the event does not repeat.
        sim.run_ticks(1_000, &mut obs);
        assert!(obs.summaries.iter().any(|s| s.spawned > 0));
        assert_eq!(obs.ended.len(), 1);
        assert_eq!(obs.summaries.iter().filter(|s| s.pandemic_ended).count(), 1);

        // Arrivals are all infected, so nobody gains a contact or tests
        // positive.  The snapshot flag records that the event fired.
        assert!(sim.population.has_spreader());
        assert!(obs.last.as_ref().unwrap().pandemic_ended);
    }

    #[test]
    fn no_event_without_any_spreader() {
        let cfg = EpiConfig { initial_infections: 0, respawn_infection_rate: 0.0, ..EpiConfig::default() };
        let mut sim = SimBuilder::new(cfg, BruteForceDetector).build().unwrap();
        let mut obs = Recorder::default();
        sim.run_ticks(200, &mut obs);
        assert!(obs.ended.is_empty());
        assert!(!sim.has_ended());
    }

    #[test]
    fn backwards_time_moves_nothing() {
        let mut a = at(0, 0.2, 0.2);
        a.travel_target = Some(Vec2::new(0.9, 0.2));
        let mut sim = build(quiet_config(), vec![a]);
        sim.step_at(Millis(1_000), &mut NoopObserver).unwrap();
        let x = sim.population.get(AgentId(0)).unwrap().position.x;
        let s = sim.step_at(Millis(500), &mut NoopObserver).unwrap();
        assert_eq!(s.elapsed, Millis::ZERO);
        assert_eq!(sim.population.get(AgentId(0)).unwrap().position.x, x);
    }
}

// ── Whole-run invariants ──────────────────────────────────────────────────────

#[cfg(test)]
mod invariants {
    use super::*;

    #[test]
    fn population_never_exceeds_cap() {
        let cfg = EpiConfig { max_population: 60, respawn_rate: Millis(50), ..EpiConfig::default() };
        let mut sim = SimBuilder::new(cfg, RTreeDetector::new()).build().unwrap();
        let mut obs = Recorder::default();
        sim.run_ticks(2_000, &mut obs);
        assert_eq!(obs.summaries.len(), 2_000);
        assert!(obs.summaries.iter().all(|s| s.population <= 60));
        assert!(obs.summaries.iter().any(|s| s.population == 60));
    }

    #[test]
    fn contacts_are_exactly_the_agents_infected() {
        let mut sim = SimBuilder::new(EpiConfig::default(), RTreeDetector::new()).build().unwrap();
        sim.run_ticks(1_500, &mut NoopObserver);

        for agent in sim.population.iter() {
            let contacts = agent.contacts();
            assert!(!contacts.contains(&agent.id));
            let mut dedup = contacts.to_vec();
            dedup.sort();
            dedup.dedup();
            assert_eq!(dedup.len(), contacts.len());
            for &c in contacts {
                if let Some(other) = sim.population.get(c) {
                    assert_eq!(other.infected_by(), Some(agent.id));
                }
            }
            assert_quarantine_consistent(agent);
        }
    }

    #[test]
    fn quarantine_follows_infection_unless_notified() {
        let cfg = EpiConfig {
            infection_radius:   0.08,
            initial_infections: 10,
            test_probability:   1.0,
            ..EpiConfig::default()
        };
        let mut sim = SimBuilder::new(cfg, RTreeDetector::new()).build().unwrap();
        let (mut self_quarantined, mut notified) = (0, 0);
        for _ in 0..1_500 {
            sim.step(&mut NoopObserver).unwrap();
            for agent in sim.population.iter() {
                assert_quarantine_consistent(agent);
                match (agent.quarantined_at(), agent.quarantined_by()) {
                    (Some(_), None) => self_quarantined += 1,
                    (Some(_), Some(_)) => notified += 1,
                    _ => {}
                }
            }
        }
        assert!(self_quarantined > 0);
        assert!(notified > 0);
    }

    #[test]
    fn notified_agent_need_not_be_infected() {
        let mut zero = at(0, 0.1, 0.1);
        zero.infect(Millis::ZERO, None);
        zero.add_contact(AgentId(1));
        zero.quarantine(Millis::ZERO, None);
        let mut sim = build(quiet_config(), vec![zero, at(1, 0.9, 0.9)]);

        sim.step_at(Millis(1_001), &mut NoopObserver).unwrap();
        let one = sim.population.get(AgentId(1)).unwrap();
        assert!(one.is_quarantined());
        assert!(one.infected_at().is_none());
        assert_eq!(one.quarantined_by(), Some(AgentId(0)));
        for agent in sim.population.iter() {
            assert_quarantine_consistent(agent);
        }
    }

    #[test]
    fn summary_counts_match_population() {
        let mut sim = SimBuilder::new(EpiConfig::default(), BruteForceDetector).build().unwrap();
        let mut obs = Recorder::default();
        sim.run_ticks(400, &mut obs);
        let last = obs.summaries.last().unwrap();
        let snap = obs.last.as_ref().unwrap();
        assert_eq!(last.population, snap.agents.len());
        assert_eq!(last.susceptible, snap.count(HealthState::Susceptible));
        assert_eq!(last.infectious, snap.count(HealthState::Infectious));
        assert_eq!(last.quarantined, snap.count(HealthState::Quarantined));
        assert_eq!(obs.starts, 400);
    }

    #[test]
    fn same_seed_same_world() {
        let run = || {
            let mut sim = SimBuilder::new(EpiConfig::default(), RTreeDetector::new()).build().unwrap();
            sim.run_ticks(600, &mut NoopObserver);
            sim.snapshot()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn detectors_agree_over_a_run() {
        let cfg = EpiConfig::default();
        let mut brute = SimBuilder::new(cfg.clone(), BruteForceDetector).build().unwrap();
        let mut tree = SimBuilder::new(cfg, RTreeDetector::new()).build().unwrap();
        brute.run_ticks(600, &mut NoopObserver);
        tree.run_ticks(600, &mut NoopObserver);
        assert_eq!(brute.snapshot(), tree.snapshot());
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::SimHost;

    #[test]
    fn stopped_sim_ignores_ticks() {
        let mut sim = build(quiet_config(), pair());
        let mut obs = Recorder::default();
        sim.step_at(Millis(100), &mut obs).unwrap();
        let before = sim.snapshot();

        sim.stop(&mut obs);
        sim.stop(&mut obs);
        assert_eq!(obs.stops, 1);
        assert!(!sim.is_running());
        assert!(sim.step_at(Millis(600), &mut obs).is_none());
        assert_eq!(sim.run_ticks(10, &mut obs), 0);
        assert_eq!(sim.snapshot(), before);
        assert_eq!(obs.starts, 1);
    }

    #[test]
    fn host_without_run_does_nothing() {
        let mut host = SimHost::new(EpiConfig::default(), RTreeDetector::new()).unwrap();
        assert!(!host.is_running());
        assert!(host.tick(Millis(16), &mut NoopObserver).is_none());
        assert_eq!(host.run_ticks(5, &mut NoopObserver), 0);
        host.stop(&mut NoopObserver);
        assert_eq!(host.runs(), 0);
    }

    #[test]
    fn restart_builds_a_fresh_world() {
        let cfg = EpiConfig::default();
        let mut host = SimHost::new(cfg.clone(), RTreeDetector::new()).unwrap();
        let mut obs = Recorder::default();

        host.start(Millis::ZERO, &mut obs).unwrap();
        for t in 1..=300 {
            host.tick(Millis(t * 16), &mut obs).unwrap();
        }
        let first = host.sim().unwrap().snapshot();
        assert_eq!(first.run_id, 1);
        assert_eq!(host.sim().unwrap().config.seed, cfg.seed);

        host.start(Millis(10_000), &mut obs).unwrap();
        assert_eq!(obs.stops, 1);
        assert_eq!(host.runs(), 2);
        let sim = host.sim().unwrap();
        assert!(sim.is_running());
        assert_eq!(sim.run_id, 2);
        assert_eq!(sim.clock.ticks, 0);
        assert_eq!(sim.clock.now, Millis(10_000));
        assert_ne!(sim.config.seed, cfg.seed);
        assert_eq!(sim.population.len(), cfg.initial_agents);
        assert!(sim.index_case().is_none());
        assert!(!sim.has_ended());

        let s = host.tick(Millis(10_016), &mut obs).unwrap();
        assert_eq!(s.run_id, 2);
        assert_eq!(s.tick, 1);
        assert_eq!(s.elapsed, Millis(16));
    }

    #[test]
    fn stopped_host_keeps_last_world_readable() {
        let mut host = SimHost::new(EpiConfig::default(), BruteForceDetector).unwrap();
        host.start(Millis::ZERO, &mut NoopObserver).unwrap();
        host.tick(Millis(16), &mut NoopObserver).unwrap();
        host.stop(&mut NoopObserver);
        assert!(!host.is_running());
        assert!(host.tick(Millis(32), &mut NoopObserver).is_none());
        assert_eq!(host.run_ticks(5, &mut NoopObserver), 0);
        assert_eq!(host.sim().unwrap().clock.ticks, 1);
    }
}
