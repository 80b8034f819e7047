//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};
use crate::writer::OutputWriter;

pub const SNAPSHOT_HEADER: [&str; 10] = [
    "run_id", "tick", "time_ms", "agent_id", "x", "y",
    "state", "opacity", "quarantine_progress", "is_index_case",
];

pub const SUMMARY_HEADER: [&str; 14] = [
    "run_id", "tick", "time_ms", "elapsed_ms", "population", "susceptible",
    "infectious", "quarantined", "spawned", "new_infections", "tested_positive",
    "notified", "removed", "pandemic_ended",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files inside it and write
    /// the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.run_id.to_string(),
                row.tick.to_string(),
                row.time_ms.to_string(),
                row.agent_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.state.to_string(),
                row.opacity.to_string(),
                row.quarantine_progress.map(|p| p.to_string()).unwrap_or_default(),
                (row.is_index_case as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.run_id.to_string(),
            row.tick.to_string(),
            row.time_ms.to_string(),
            row.elapsed_ms.to_string(),
            row.population.to_string(),
            row.susceptible.to_string(),
            row.infectious.to_string(),
            row.quarantined.to_string(),
            row.spawned.to_string(),
            row.new_infections.to_string(),
            row.tested_positive.to_string(),
            row.notified.to_string(),
            row.removed.to_string(),
            (row.pandemic_ended as u8).to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        // Rows may follow a finish (a restarted run), so this only flushes.
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
