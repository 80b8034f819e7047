//! R-tree accelerated contact detection.
//!
//! The tree holds every live agent's position as of [`prepare`]; a query
//! fetches candidates within the contact distance (`2 * radius`, inclusive
//! in the tree) and then applies the same strict circle test and live
//! susceptibility check as the brute-force scan.
//!
//! [`prepare`]: crate::ContactDetector::prepare

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ct_agent::{Agent, Population};
use ct_core::AgentId;

use crate::ContactDetector;
use crate::detector::is_exposed;

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// One agent position in the index.
#[derive(Clone, Debug)]
struct AgentEntry {
    point: [f64; 2],
    id:    AgentId,
}

impl RTreeObject for AgentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for AgentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── RTreeDetector ─────────────────────────────────────────────────────────────

/// Contact detector backed by an R-tree that is bulk-loaded once per tick.
pub struct RTreeDetector {
    tree: RTree<AgentEntry>,
}

impl RTreeDetector {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Number of positions currently indexed.
    pub fn indexed(&self) -> usize {
        self.tree.size()
    }
}

impl Default for RTreeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RTreeDetector {
    /// A clone starts with an empty index; the next `prepare` fills it.
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl ContactDetector for RTreeDetector {
    fn prepare(&mut self, population: &Population) {
        let entries = population
            .iter()
            .map(|agent| AgentEntry { point: agent.position.as_array(), id: agent.id })
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    fn exposed(&self, infector: &Agent, population: &Population, radius: f64) -> Vec<AgentId> {
        let reach = 2.0 * radius;
        let mut ids: Vec<AgentId> = self
            .tree
            .locate_within_distance(infector.position.as_array(), reach * reach)
            .filter_map(|entry| population.get(entry.id))
            .filter(|other| is_exposed(infector, other, radius))
            .map(|other| other.id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
