//! Plain data row types written by output backends.

use ct_sim::{AgentView, TickSummary, WorldSnapshot};

/// One agent as seen at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub run_id:              u64,
    pub tick:                u64,
    pub time_ms:             u64,
    pub agent_id:            u32,
    pub x:                   f64,
    pub y:                   f64,
    /// `susceptible`, `infectious` or `quarantined`.
    pub state:               &'static str,
    pub opacity:             f32,
    /// Empty in the CSV when the agent is free or the lifetime is infinite.
    pub quarantine_progress: Option<f32>,
    pub is_index_case:       bool,
}

impl AgentSnapshotRow {
    pub fn new(snapshot: &WorldSnapshot, view: &AgentView) -> Self {
        Self {
            run_id:              snapshot.run_id,
            tick:                snapshot.tick,
            time_ms:             snapshot.time.0,
            agent_id:            view.id.0,
            x:                   view.position.x,
            y:                   view.position.y,
            state:               view.state.as_str(),
            opacity:             view.opacity,
            quarantine_progress: view.quarantine_progress,
            is_index_case:       view.is_index_case,
        }
    }
}

/// Counters for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub run_id:          u64,
    pub tick:            u64,
    pub time_ms:         u64,
    pub elapsed_ms:      u64,
    pub population:      u64,
    pub susceptible:     u64,
    pub infectious:      u64,
    pub quarantined:     u64,
    pub spawned:         u64,
    pub new_infections:  u64,
    pub tested_positive: u64,
    pub notified:        u64,
    pub removed:         u64,
    pub pandemic_ended:  bool,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            run_id:          s.run_id,
            tick:            s.tick,
            time_ms:         s.time.0,
            elapsed_ms:      s.elapsed.0,
            population:      s.population as u64,
            susceptible:     s.susceptible as u64,
            infectious:      s.infectious as u64,
            quarantined:     s.quarantined as u64,
            spawned:         s.spawned as u64,
            new_infections:  s.new_infections as u64,
            tested_positive: s.tested_positive as u64,
            notified:        s.notified as u64,
            removed:         s.removed as u64,
            pandemic_ended:  s.pandemic_ended,
        }
    }
}
