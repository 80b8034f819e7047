//! `ct-sim`: tick loop orchestrator for the contagion engine.
//!
//! # Tick order
//!
//! ```text
//! step_at(now):
//!   ① Clock     elapsed = now - last_tick; `now` is reused for the whole tick.
//!   ② Respawn   maybe admit one arriving agent (below the cap only).
//!   ③ Test      global random single test, if that policy is selected.
//!   ④ Move      every live agent, in ascending id order.
//!   ⑤ Index     ContactDetector::prepare on the moved positions.
//!   ⑥ Health    per agent: spread, per-agent test, notify, then removal.
//!   ⑦ Observe   end-of-pandemic check, snapshot, tick summary.
//! ```
//!
//! Steps ④ and ⑥ iterate over a copy of the ids taken before ④, so agents
//! admitted or removed mid-tick are never skipped or visited twice.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ct_core::{EpiConfig, Millis};
//! use ct_sim::{NoopObserver, SimBuilder};
//! use ct_spatial::RTreeDetector;
//!
//! let mut sim = SimBuilder::new(EpiConfig::default(), RTreeDetector::new()).build()?;
//! sim.run_ticks(600, &mut NoopObserver);
//! println!("{} agents alive", sim.population.len());
//! ```

pub mod builder;
pub mod error;
pub mod host;
pub mod observer;
pub mod sim;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use host::SimHost;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use snapshot::{AgentView, ContactEdge, TickSummary, WorldSnapshot};
