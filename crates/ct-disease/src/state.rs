use std::fmt;

use ct_agent::Agent;

/// Discrete health category, as shown to the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HealthState {
    /// Neither infected nor quarantined.
    Susceptible,
    /// Infected and circulating (incubating or contagious).
    Infectious,
    /// Quarantined, whether infected or merely notified.
    Quarantined,
}

impl HealthState {
    pub fn of(agent: &Agent) -> Self {
        if agent.is_quarantined() {
            HealthState::Quarantined
        } else if agent.is_infected() {
            HealthState::Infectious
        } else {
            HealthState::Susceptible
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Susceptible => "susceptible",
            HealthState::Infectious => "infectious",
            HealthState::Quarantined => "quarantined",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
