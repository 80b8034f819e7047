//! Simulation observer trait for rendering, progress reporting, and output.

use ct_core::Millis;

use crate::{TickSummary, WorldSnapshot};

/// Callbacks invoked by [`Sim`][crate::Sim] at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, summary: &TickSummary) {
///         if summary.tick % self.interval == 0 {
///             println!("{}: {} infectious", summary.time, summary.infectious);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each tick, after the clock moved to `time`.
    fn on_tick_start(&mut self, _time: Millis) {}

    /// Whether [`on_snapshot`](Self::on_snapshot) should be called.
    /// Returning `false` skips building the snapshot altogether.
    fn wants_snapshot(&self) -> bool {
        true
    }

    /// Read-only view of every agent after the tick's transitions.
    fn on_snapshot(&mut self, _snapshot: &WorldSnapshot) {}

    /// Counters for the tick just finished.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// Fired once per run, on the first tick where no agent is infected and
    /// unquarantined after at least one was.
    fn on_pandemic_end(&mut self, _time: Millis) {}

    /// Fired once when the run is stopped.
    fn on_stop(&mut self, _time: Millis) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to drive the loop
/// but don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {
    fn wants_snapshot(&self) -> bool {
        false
    }
}
