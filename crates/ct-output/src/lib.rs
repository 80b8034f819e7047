//! `ct-output`: simulation output writers for the contagion engine.
//!
//! | Backend | Files created                               |
//! |---------|---------------------------------------------|
//! | CSV     | `agent_snapshots.csv`, `tick_summaries.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ct_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ct_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, 10);
//! sim.run_ticks(1_000, &mut obs);
//! sim.stop(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
