//! `ct-disease`: the per-agent epidemic state machine.
//!
//! # Crate layout
//!
//! | Module           | Contents                                                    |
//! |------------------|-------------------------------------------------------------|
//! | [`state`]        | `HealthState`: the visual/health category of an agent      |
//! | [`movement`]     | Travel toward a target, pause, world wrap                   |
//! | [`infection`]    | Transmission from one contagious agent to its neighbours    |
//! | [`testing`]      | Per-agent probabilistic and global random single testing    |
//! | [`notification`] | Quarantine onset for contacts after the notification delay  |
//! | [`transition`]   | `advance_agent`: one agent's health step in tick order     |
//!
//! # States
//!
//! ```text
//! susceptible ──infect──▶ infected ──test──▶ quarantined ──life over──▶ removed
//!      │                                         ▲          (finite lifetime only)
//!      └──────────────── notified ───────────────┘
//! ```
//!
//! `infected_at` and `quarantined_at` are write-once, so no transition ever
//! leads back.  All functions take `now` from the caller: one timestamp per
//! tick.

pub mod infection;
pub mod movement;
pub mod notification;
pub mod state;
pub mod testing;
pub mod transition;


pub use infection::spread_from;
pub use movement::{Movement, step_movement};
pub use notification::notify_contacts;
pub use state::HealthState;
pub use testing::{TestResult, apply_test, global_random_test, per_agent_test};
pub use transition::{AgentEvents, advance_agent};
