//! `ct-core`: foundational types for the `contagion` epidemic engine.
//!
//! This crate is a dependency of every other `ct-*` crate.  It has no `ct-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`geo`]         | `Vec2`, `distance`, `circle_intersection`             |
//! | [`time`]        | `Millis`, `SimClock`                                  |
//! | [`rng`]         | `SimRng` (shared random source)                       |
//! | [`config`]      | `EpiConfig`, `QuarantineLifetime`, `TestingPolicy`    |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EpiConfig, QuarantineLifetime, TestingPolicy};
pub use error::{CoreError, CoreResult};
pub use geo::{Vec2, circle_intersection, distance};
pub use ids::AgentId;
pub use rng::SimRng;
pub use time::{Millis, SimClock};
