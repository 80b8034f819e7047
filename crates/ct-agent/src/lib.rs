//! `ct-agent`: agent entity and population storage for the `contagion` engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`agent`]     | `Agent`: one individual: position, travel, health timestamps |
//! | [`factory`]   | `AgentFactory`: id allocation and random agent construction  |
//! | [`store`]     | `Population`: id-keyed, capacity-bounded agent collection    |
//! | [`manager`]   | `PopulationManager`: initial cohort, respawn, removal        |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                               |
//! |---------|------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Agent`.        |

pub mod agent;
pub mod error;
pub mod factory;
pub mod manager;
pub mod store;


pub use agent::Agent;
pub use error::{AgentError, AgentResult};
pub use factory::AgentFactory;
pub use manager::PopulationManager;
pub use store::Population;
