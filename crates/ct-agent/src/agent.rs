//! The `Agent` entity.
//!
//! The health timestamps are write-once: `infected_at` and `quarantined_at`
//! can only move from `None` to `Some`, through [`Agent::infect`] and
//! [`Agent::quarantine`].  The contact list can only grow, through
//! [`Agent::add_contact`], which rejects duplicates and the agent's own id.

use ct_core::{AgentId, Millis, Vec2};

/// One simulated individual.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,

    // ── Movement ──────────────────────────────────────────────────────────
    /// Position in normalized world coordinates.
    pub position: Vec2,
    /// Where the agent is heading.  `None` while it pauses.
    pub travel_target: Option<Vec2>,
    /// Propensity in `[0, 1)` to start a new trip once the pause is over.
    pub travel_frequency: f64,
    /// Last arrival at a target (or spawn time).
    pub last_traveled: Millis,

    // ── Health ────────────────────────────────────────────────────────────
    infected_at: Option<Millis>,
    infected_by: Option<AgentId>,
    /// Agents this agent infected, in infection order.
    contacts: Vec<AgentId>,
    quarantined_at: Option<Millis>,
    quarantined_by: Option<AgentId>,

    // ── Testing & notification ────────────────────────────────────────────
    /// Set when quarantine came from a positive test rather than a notice.
    pub is_index_case: bool,
    has_notified_contacts: bool,
    pub last_tested: Millis,
}

impl Agent {
    /// A susceptible, idle agent at `position`, created at `now`.
    pub fn new(id: AgentId, position: Vec2, now: Millis) -> Self {
        Self {
            id,
            position,
            travel_target: None,
            travel_frequency: 0.0,
            last_traveled: now,
            infected_at: None,
            infected_by: None,
            contacts: Vec::new(),
            quarantined_at: None,
            quarantined_by: None,
            is_index_case: false,
            has_notified_contacts: false,
            last_tested: now,
        }
    }

    // ── Health queries ────────────────────────────────────────────────────

    #[inline]
    pub fn infected_at(&self) -> Option<Millis> {
        self.infected_at
    }

    #[inline]
    pub fn infected_by(&self) -> Option<AgentId> {
        self.infected_by
    }

    #[inline]
    pub fn quarantined_at(&self) -> Option<Millis> {
        self.quarantined_at
    }

    /// The agent whose notification started this quarantine.  `None` when
    /// the quarantine came from a test (or the agent is not quarantined).
    #[inline]
    pub fn quarantined_by(&self) -> Option<AgentId> {
        self.quarantined_by
    }

    #[inline]
    pub fn contacts(&self) -> &[AgentId] {
        &self.contacts
    }

    #[inline]
    pub fn has_notified_contacts(&self) -> bool {
        self.has_notified_contacts
    }

    #[inline]
    pub fn is_infected(&self) -> bool {
        self.infected_at.is_some()
    }

    #[inline]
    pub fn is_quarantined(&self) -> bool {
        self.quarantined_at.is_some()
    }

    /// Neither infected nor quarantined.
    #[inline]
    pub fn is_susceptible(&self) -> bool {
        !self.is_infected() && !self.is_quarantined()
    }

    /// Infected and still circulating.  The pandemic is over once no agent
    /// is spreading.
    #[inline]
    pub fn is_spreading(&self) -> bool {
        self.is_infected() && !self.is_quarantined()
    }

    /// Spreading and past the incubation delay.
    pub fn is_contagious(&self, now: Millis, infection_delay: Millis) -> bool {
        match self.infected_at {
            Some(at) if !self.is_quarantined() => now.exceeds(at, infection_delay),
            _ => false,
        }
    }

    /// Time spent in quarantine so far.
    pub fn quarantine_elapsed(&self, now: Millis) -> Option<Millis> {
        self.quarantined_at.map(|at| now.since(at))
    }

    /// Fraction of `life` spent in quarantine, clamped to `[0, 1]`.
    pub fn quarantine_progress(&self, now: Millis, life: Millis) -> Option<f32> {
        let elapsed = self.quarantine_elapsed(now)?;
        if life == Millis::ZERO {
            return Some(1.0);
        }
        Some((elapsed.as_f64() / life.as_f64()).clamp(0.0, 1.0) as f32)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Infect a susceptible agent.  Returns `false` (and changes nothing) if
    /// the agent is already infected or quarantined.
    pub fn infect(&mut self, now: Millis, by: Option<AgentId>) -> bool {
        if !self.is_susceptible() {
            return false;
        }
        self.infected_at = Some(now);
        self.infected_by = by.filter(|&b| b != self.id);
        true
    }

    /// Start quarantine.  Returns `false` if already quarantined.
    pub fn quarantine(&mut self, now: Millis, by: Option<AgentId>) -> bool {
        if self.is_quarantined() {
            return false;
        }
        self.quarantined_at = Some(now);
        self.quarantined_by = by;
        true
    }

    /// Record that this agent infected `other`.  Duplicates and the agent's
    /// own id are ignored; returns whether the list grew.
    pub fn add_contact(&mut self, other: AgentId) -> bool {
        if other == self.id || self.contacts.contains(&other) {
            return false;
        }
        self.contacts.push(other);
        true
    }

    /// Flip the notification latch.  Returns `true` only the first time.
    pub fn mark_notified(&mut self) -> bool {
        !std::mem::replace(&mut self.has_notified_contacts, true)
    }
}
