//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(AgentSnapshotRow::HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(TickSummaryRow::HEADER)?;

        debug!(dir = %dir.display(), "csv output opened");
        Ok(Self { snapshots, summaries, finished: false })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            let mut record = vec![
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.health.to_string(),
                row.hunger.to_string(),
                row.fatigue.to_string(),
                row.fear.to_string(),
                row.loneliness.to_string(),
                opt(row.boundary),
                row.action.to_owned(),
                row.unresolved.to_string(),
                row.leaps.to_string(),
            ];
            record.extend(row.weights.iter().map(f32::to_string));
            record.push(row.relations.to_string());
            self.snapshots.write_record(&record)?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let mut record = vec![row.tick.to_string(), row.alive.to_string()];
        record.extend(row.actions.iter().map(u64::to_string));
        record.extend([
            row.leaps.to_string(),
            row.boundaries.to_string(),
            row.boundaries_formed.to_string(),
            row.boundaries_dissolved.to_string(),
            row.hunts_resolved.to_string(),
            row.hunts_succeeded.to_string(),
            row.deaths.to_string(),
            opt(row.mean_kappa),
        ]);
        self.summaries.write_record(&record)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
