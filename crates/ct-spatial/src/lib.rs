//! `ct-spatial`: who is close enough to catch it.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`detector`] | `ContactDetector` trait, `BruteForceDetector`                |
//! | [`index`]    | `RTreeDetector`: R-tree broad phase over agent positions    |
//!
//! # Pluggability
//!
//! `ct-sim` calls contact detection through the [`ContactDetector`] trait, so
//! a host can trade the reference O(n²) scan for the R-tree index (or its
//! own structure) without touching the state machine.  Both shipped
//! detectors return exactly the same ids in the same (ascending) order.

pub mod detector;
pub mod index;


pub use detector::{BruteForceDetector, ContactDetector};
pub use index::RTreeDetector;
