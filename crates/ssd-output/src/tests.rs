//! Integration tests for ssd-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(agent_id: u32, tick: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            agent_id,
            tick,
            x:          agent_id as f32,
            y:          0.5,
            health:     1.0,
            hunger:     0.25,
            fatigue:    0.0,
            fear:       0.0,
            loneliness: 0.5,
            boundary:   (agent_id == 1).then_some(7),
            action:     "explore",
            unresolved: 0.0,
            leaps:      0,
            weights:    [0.4, 0.3, 0.2, 0.1],
            relations:  2,
        }
    }

    fn summary_row(tick: u64) -> TickSummaryRow {
        TickSummaryRow {
            tick,
            alive:                8,
            actions:              [1, 0, 4, 0, 2, 1, 0],
            leaps:                1,
            boundaries:           1,
            boundaries_formed:    0,
            boundaries_dissolved: 0,
            hunts_resolved:       1,
            hunts_succeeded:      0,
            deaths:               0,
            mean_kappa:           None,
        }
    }

    fn read_all(path: std::path::PathBuf) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("agent_snapshots.csv").exists());
        assert!(dir.path().join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("a");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("tick_summaries.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, AgentSnapshotRow::HEADER);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, TickSummaryRow::HEADER);
    }

    #[test]
    fn csv_snapshot_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = vec![snap_row(0, 5), snap_row(1, 5), snap_row(2, 5)];
        w.write_snapshots(&rows).unwrap();
        w.finish().unwrap();

        let read_rows = read_all(dir.path().join("agent_snapshots.csv"));
        assert_eq!(read_rows.len(), 3);
        assert_eq!(read_rows[0].len(), AgentSnapshotRow::HEADER.len());
        assert_eq!(&read_rows[0][0], "0");       // agent_id
        assert_eq!(&read_rows[0][1], "5");       // tick
        assert_eq!(&read_rows[0][9], "");        // no boundary
        assert_eq!(&read_rows[1][9], "7");
        assert_eq!(&read_rows[2][10], "explore");
        assert_eq!(&read_rows[2][13], "0.4");    // w_physical
        assert_eq!(&read_rows[2][17], "2");      // relations
    }

    #[test]
    fn csv_tick_summary_round_trip() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&summary_row(50)).unwrap();
        w.finish().unwrap();

        let read_rows = read_all(dir.path().join("tick_summaries.csv"));
        assert_eq!(read_rows.len(), 1);
        let r = &read_rows[0];
        assert_eq!(r.len(), TickSummaryRow::HEADER.len());
        assert_eq!(&r[0], "50");   // tick
        assert_eq!(&r[1], "8");    // alive
        assert_eq!(&r[4], "4");    // explore
        assert_eq!(&r[7], "1");    // hunt
        assert_eq!(&r[13], "1");   // hunts_resolved
        assert_eq!(&r[16], "");    // mean_kappa with no relations
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_snapshot_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[]).unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use ssd_agent::AgentStoreBuilder;
    use ssd_behavior::IdleBehavior;
    use ssd_core::{Position, SimConfig, SsdConfig};
    use ssd_sim::{EmptyWorld, SimBuilder};

    use crate::csv::CsvWriter;
    use crate::observer::SimOutputObserver;
    use crate::row::{AgentSnapshotRow, TickSummaryRow};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult};

    fn config(total_ticks: u64, output_interval_ticks: u64) -> SimConfig {
        SimConfig {
            total_ticks,
            seed:          1,
            num_threads:   Some(1),
            output_interval_ticks,
        }
    }

    fn idle_sim(config: &SimConfig) -> ssd_sim::Sim<IdleBehavior, EmptyWorld> {
        let params = SsdConfig::default();
        let (store, rngs) = AgentStoreBuilder::new(3, config.seed)
            .weights(params.alignment.initial_weights)
            .build();
        SimBuilder::new(config.clone(), store, rngs, IdleBehavior, EmptyWorld)
            .params(params)
            .positions(vec![Position::new(0.0, 0.0), Position::new(5.0, 0.0), Position::new(0.0, 5.0)])
            .build()
            .unwrap()
    }

    /// Fails every summary write after the first.
    #[derive(Default)]
    struct Flaky {
        summaries: usize,
        finished:  usize,
    }

    impl OutputWriter for Flaky {
        fn write_snapshots(&mut self, _rows: &[AgentSnapshotRow]) -> OutputResult<()> {
            Ok(())
        }

        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries += 1;
            if self.summaries > 1 {
                let msg = format!("disk full at tick {}", row.tick);
                return Err(OutputError::Io(std::io::Error::other(msg)));
            }
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn integration_csv() {
        let config = config(6, 2);
        let mut sim = idle_sim(&config);

        let dir = tempfile::tempdir().expect("create temp dir");
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Snapshots at ticks 0, 2 and 4 for three agents.
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 9, "expected 3 ticks × 3 agents = 9 snapshot rows, got {}", rows.len());
        assert!(rows.iter().all(|r| &r[10] == "idle"));
        let ticks: Vec<&str> = rows.iter().map(|r| &r[1]).collect();
        assert_eq!(ticks, ["0", "0", "0", "2", "2", "2", "4", "4", "4"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let summaries: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(summaries.len(), 6);
        assert_eq!(&summaries[5][0], "5");
        assert!(summaries.iter().all(|r| &r[1] == "3" && &r[2] == "3"), "all alive and idle");
    }

    #[test]
    fn first_error_is_kept_and_finish_still_runs() {
        let config = config(4, 0);
        let mut sim = idle_sim(&config);

        let mut obs = SimOutputObserver::new(Flaky::default());
        sim.run(&mut obs).unwrap();

        let err = obs.take_error().expect("write error stored");
        assert!(err.to_string().contains("tick 1"), "first failure kept: {err}");
        assert!(obs.take_error().is_none(), "error is taken once");

        let writer = obs.into_writer();
        assert_eq!(writer.summaries, 4);
        assert_eq!(writer.finished, 1);
    }
}
