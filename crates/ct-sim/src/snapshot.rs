//! Read-only views of the world handed to observers.

use ct_agent::{Agent, Population};
use ct_core::{AgentId, EpiConfig, Millis, QuarantineLifetime, Vec2};
use ct_disease::HealthState;

/// What a renderer needs to draw one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vec2,
    pub state: HealthState,
    /// 1.0 for free agents.  Quarantined agents fade toward 0 over a finite
    /// lifetime, or sit at `quarantined_opacity` when it is infinite.
    pub opacity: f32,
    /// Fraction of the quarantine life already spent (finite lifetime only).
    pub quarantine_progress: Option<f32>,
    pub is_index_case: bool,
}

impl AgentView {
    pub fn of(agent: &Agent, config: &EpiConfig, now: Millis) -> Self {
        let state = HealthState::of(agent);
        let (opacity, quarantine_progress) = match (state, config.quarantine_lifetime) {
            (HealthState::Quarantined, QuarantineLifetime::Finite(life)) => {
                let progress = agent.quarantine_progress(now, life);
                (1.0 - progress.unwrap_or(0.0), progress)
            }
            (HealthState::Quarantined, QuarantineLifetime::Infinite) => {
                (config.quarantined_opacity, None)
            }
            _ => (1.0, None),
        };
        Self {
            id: agent.id,
            position: agent.position,
            state,
            opacity,
            quarantine_progress,
            is_index_case: agent.is_index_case,
        }
    }
}

/// A line from an infected agent to one of the agents it exposed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContactEdge {
    pub from: AgentId,
    pub to: AgentId,
}

/// The whole world at the end of one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WorldSnapshot {
    pub run_id: u64,
    pub tick: u64,
    pub time: Millis,
    /// Ascending by id.
    pub agents: Vec<AgentView>,
    pub edges: Vec<ContactEdge>,
    /// The end-of-pandemic event has fired in this run.  Stays set even if
    /// a later arrival brings infection back.
    pub pandemic_ended: bool,
}

impl WorldSnapshot {
    pub fn capture(
        population:     &Population,
        config:         &EpiConfig,
        run_id:         u64,
        tick:           u64,
        time:           Millis,
        pandemic_ended: bool,
    ) -> Self {
        let agents = population.iter().map(|a| AgentView::of(a, config, time)).collect();

        // Contacts that have since left the world are not drawn.
        let edges = population
            .iter()
            .filter(|a| a.is_infected())
            .flat_map(|a| {
                a.contacts()
                    .iter()
                    .filter(|&&c| population.contains(c))
                    .map(move |&to| ContactEdge { from: a.id, to })
            })
            .collect();

        Self { run_id, tick, time, agents, edges, pandemic_ended }
    }

    pub fn count(&self, state: HealthState) -> usize {
        self.agents.iter().filter(|v| v.state == state).count()
    }
}

/// Per-tick counters reported through
/// [`SimObserver::on_tick_end`](crate::SimObserver::on_tick_end).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TickSummary {
    pub run_id: u64,
    pub tick: u64,
    pub time: Millis,
    pub elapsed: Millis,

    // ── State after the tick ──────────────────────────────────────────────
    pub population: usize,
    pub susceptible: usize,
    pub infectious: usize,
    pub quarantined: usize,

    // ── Events during the tick ────────────────────────────────────────────
    pub spawned: usize,
    pub new_infections: usize,
    pub tested_positive: usize,
    pub notified: usize,
    pub removed: usize,
    /// Set only on the tick the end-of-pandemic event fired.
    pub pandemic_ended: bool,
}

impl TickSummary {
    pub(crate) fn tally(&mut self, population: &Population) {
        self.population = population.len();
        self.susceptible = population.count_where(Agent::is_susceptible);
        self.infectious = population.count_where(Agent::is_spreading);
        self.quarantined = population.count_where(Agent::is_quarantined);
    }
}
