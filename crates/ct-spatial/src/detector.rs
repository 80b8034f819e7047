//! Contact detection trait and the reference O(n²) implementation.

use ct_agent::{Agent, Population};
use ct_core::{AgentId, circle_intersection};

// ── ContactDetector trait ─────────────────────────────────────────────────────

/// Finds the agents an infectious agent exposes this tick.
///
/// An agent is exposed when it is susceptible (neither infected nor
/// quarantined) and the two circles of radius `radius` around it and around
/// `infector` overlap strictly.
///
/// The loop calls [`prepare`](Self::prepare) once per tick after every agent
/// has moved and before the first [`exposed`](Self::exposed) query.  Between
/// those calls positions do not change, but health states do: `exposed`
/// must read susceptibility from the live `population`, so an agent infected
/// by an earlier infector this tick is not reported again.
pub trait ContactDetector {
    /// Rebuild any per-tick acceleration structure.  Default: nothing.
    fn prepare(&mut self, _population: &Population) {}

    /// Ids of every susceptible agent within reach of `infector`, ascending.
    fn exposed(&self, infector: &Agent, population: &Population, radius: f64) -> Vec<AgentId>;
}

/// `true` if `other` is a valid exposure target for `infector`.
#[inline]
pub(crate) fn is_exposed(infector: &Agent, other: &Agent, radius: f64) -> bool {
    other.id != infector.id
        && other.is_susceptible()
        && circle_intersection(infector.position, radius, other.position, radius)
}

// ── BruteForceDetector ────────────────────────────────────────────────────────

/// Compares the infector against every live agent: O(n) per query, O(n²)
/// per tick.  The population cap keeps this tractable.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceDetector;

impl ContactDetector for BruteForceDetector {
    fn exposed(&self, infector: &Agent, population: &Population, radius: f64) -> Vec<AgentId> {
        population
            .iter()
            .filter(|other| is_exposed(infector, other, radius))
            .map(|other| other.id)
            .collect()
    }
}
