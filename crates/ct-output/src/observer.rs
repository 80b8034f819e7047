//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use log::warn;

use ct_core::Millis;
use ct_sim::{SimObserver, TickSummary, WorldSnapshot};

use crate::row::{AgentSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes agent snapshots and tick summaries to any
/// [`OutputWriter`] backend.
///
/// Every tick gets a summary row.  Agent rows are written on ticks that are
/// a multiple of `snapshot_interval`; an interval of 0 disables them.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  Check for them with [`take_error`][Self::take_error].
/// The writer is flushed when the run stops.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:            W,
    snapshot_interval: u64,
    last_error:        Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, snapshot_interval: u64) -> Self {
        Self {
            writer,
            snapshot_interval,
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer now instead of waiting for the run to stop.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!("output write failed: {e}");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn wants_snapshot(&self) -> bool {
        self.snapshot_interval > 0
    }

    fn on_snapshot(&mut self, snapshot: &WorldSnapshot) {
        if self.snapshot_interval == 0 || !snapshot.tick.is_multiple_of(self.snapshot_interval) {
            return;
        }
        let rows: Vec<AgentSnapshotRow> = snapshot
            .agents
            .iter()
            .map(|view| AgentSnapshotRow::new(snapshot, view))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_stop(&mut self, _time: Millis) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
