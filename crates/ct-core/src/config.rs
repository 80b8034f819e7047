//! Engine configuration.
//!
//! Every radius, rate, delay, and population bound is a field of
//! [`EpiConfig`] so tests and hosts can override any of them.  Distances are
//! in normalized world units (the visible area is the unit square); durations
//! are [`Millis`].
//!
//! The two behavioral profiles of the engine are expressed as named options
//! rather than separate state machines:
//!
//! | Option                | Values                                          |
//! |-----------------------|-------------------------------------------------|
//! | `quarantine_lifetime` | `Finite(life)` / `Infinite`                     |
//! | `testing_policy`      | `PerAgentProbabilistic` / `GlobalRandomSingle`  |

use crate::{CoreError, CoreResult, Millis};

// ── Profile options ───────────────────────────────────────────────────────────

/// How long a quarantined agent stays in the population.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuarantineLifetime {
    /// Removed once `now - quarantined_at` exceeds the given life.
    Finite(Millis),
    /// Kept forever; the renderer only dims it.
    Infinite,
}

impl QuarantineLifetime {
    /// The finite life, if any.
    #[inline]
    pub fn life(self) -> Option<Millis> {
        match self {
            QuarantineLifetime::Finite(life) => Some(life),
            QuarantineLifetime::Infinite => None,
        }
    }
}

/// How infected agents get found.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TestingPolicy {
    /// Each agent becomes eligible `testing_frequency` after its last test and
    /// is then tested with probability `test_probability`.
    PerAgentProbabilistic,
    /// Every `testing_frequency`, one live agent drawn uniformly is tested.
    GlobalRandomSingle,
}

// ── EpiConfig ─────────────────────────────────────────────────────────────────

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EpiConfig {
    // ── Geometry ──────────────────────────────────────────────────────────
    /// Body radius used for the arrival test.
    pub cell_radius: f64,
    /// Radius of the travel target used for the arrival test.
    pub goal_radius: f64,
    /// Radius used on both sides of the contact test.
    pub infection_radius: f64,
    /// World units travelled per elapsed millisecond.
    pub cell_speed: f64,
    /// Coordinates beyond `+wrap_bound` reset to 0, beyond `-wrap_bound` to 1.
    pub wrap_bound: f64,

    // ── Population ────────────────────────────────────────────────────────
    /// Size of the cohort created at start.
    pub initial_agents: usize,
    /// How many of the initial cohort start infected.
    pub initial_infections: usize,
    /// Chance that an initial agent starts with a travel target.
    pub initial_travel_chance: f64,
    /// Minimum time between two respawns.
    pub respawn_rate: Millis,
    /// Chance that a respawned agent arrives already infected.
    pub respawn_infection_rate: f64,
    /// Hard cap on the live population.
    pub max_population: usize,

    // ── Movement ──────────────────────────────────────────────────────────
    /// Minimum idle time after an arrival before a new trip may start.
    pub pause_interval: Millis,

    // ── Disease & testing ─────────────────────────────────────────────────
    /// Incubation before an infected agent starts transmitting.
    pub infection_delay: Millis,
    /// Test eligibility interval (per agent, or between global tests).
    pub testing_frequency: Millis,
    /// Chance that an eligible agent is actually tested (per-agent policy).
    pub test_probability: f64,
    pub testing_policy: TestingPolicy,

    // ── Quarantine ────────────────────────────────────────────────────────
    /// Time between quarantine onset and notifying contacts.
    pub notification_delay: Millis,
    pub quarantine_lifetime: QuarantineLifetime,
    /// Whether notification also quarantines the agent's own infector.
    pub notify_infector: bool,
    /// Opacity hint for quarantined agents when the lifetime is infinite.
    pub quarantined_opacity: f32,

    // ── Loop ──────────────────────────────────────────────────────────────
    /// Fixed step used when the loop drives its own clock.
    pub frame_millis: Millis,
    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,
}

impl Default for EpiConfig {
    fn default() -> Self {
        Self {
            cell_radius:            0.005,
            goal_radius:            0.005,
            infection_radius:       0.02,
            cell_speed:             0.0001,
            wrap_bound:             2.1,

            initial_agents:         50,
            initial_infections:     2,
            initial_travel_chance:  0.75,
            respawn_rate:           Millis(200),
            respawn_infection_rate: 0.1,
            max_population:         200,

            pause_interval:         Millis(1_000),

            infection_delay:        Millis(500),
            testing_frequency:      Millis(3_500),
            test_probability:       0.55,
            testing_policy:         TestingPolicy::PerAgentProbabilistic,

            notification_delay:     Millis(1_000),
            quarantine_lifetime:    QuarantineLifetime::Finite(Millis(3_000)),
            notify_infector:        true,
            quarantined_opacity:    0.35,

            frame_millis:           Millis(16),
            seed:                   42,
        }
    }
}

impl EpiConfig {
    /// Quarantined agents fade out and leave; every agent tests itself.
    pub fn finite_quarantine() -> Self {
        Self::default()
    }

    /// Quarantined agents stay forever; one random agent is tested per
    /// interval.
    pub fn persistent_quarantine() -> Self {
        Self {
            quarantine_lifetime: QuarantineLifetime::Infinite,
            testing_policy:      TestingPolicy::GlobalRandomSingle,
            ..Self::default()
        }
    }

    /// Reject configurations the engine cannot run sensibly.
    pub fn validate(&self) -> CoreResult<()> {
        let radii = [
            ("cell_radius", self.cell_radius),
            ("goal_radius", self.goal_radius),
            ("infection_radius", self.infection_radius),
            ("cell_speed", self.cell_speed),
            ("wrap_bound", self.wrap_bound),
        ];
        for (name, value) in radii {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Config(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let probabilities = [
            ("initial_travel_chance", self.initial_travel_chance),
            ("respawn_infection_rate", self.respawn_infection_rate),
            ("test_probability", self.test_probability),
            ("quarantined_opacity", self.quarantined_opacity as f64),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(CoreError::Config(format!("{name} must lie in [0, 1], got {p}")));
            }
        }

        if self.max_population == 0 {
            return Err(CoreError::Config("max_population must be at least 1".into()));
        }
        if self.initial_agents > self.max_population {
            return Err(CoreError::Config(format!(
                "initial_agents ({}) exceeds max_population ({})",
                self.initial_agents, self.max_population
            )));
        }
        if self.initial_infections > self.initial_agents {
            return Err(CoreError::Config(format!(
                "initial_infections ({}) exceeds initial_agents ({})",
                self.initial_infections, self.initial_agents
            )));
        }
        if self.frame_millis == Millis::ZERO {
            return Err(CoreError::Config("frame_millis must be non-zero".into()));
        }
        if self.quarantine_lifetime == QuarantineLifetime::Finite(Millis::ZERO) {
            return Err(CoreError::Config("finite quarantine life must be non-zero".into()));
        }
        Ok(())
    }
}
