//! Strongly typed, zero-cost agent identifier.
//!
//! `AgentId` is `Copy + Ord + Hash` so it can be used as a map key and a
//! sorted collection element without ceremony.  Ids are handed out by a
//! monotonically increasing counter and are never reused within a run, so
//! ascending id order is also admission order.

use std::fmt;

/// Opaque, stable identity of one agent for its whole lifetime.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u32);

impl AgentId {
    /// Sentinel meaning "no valid ID", equivalent to `u32::MAX`.
    pub const INVALID: AgentId = AgentId(u32::MAX);

    /// The id following `self` in allocation order, or `None` once the
    /// next value would be the sentinel.
    #[inline]
    pub fn next(self) -> Option<AgentId> {
        self.0.checked_add(1).map(AgentId).filter(|id| *id != Self::INVALID)
    }
}

impl Default for AgentId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}
