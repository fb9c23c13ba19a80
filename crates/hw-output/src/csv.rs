//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `hourly_arrivals.csv`
//! - `segment_traversals.csv`
//! - `shoulder_waits.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{HourlyArrivalRow, OutputResult, SegmentTraversalRow, ShoulderWaitRow};

/// Writes the final report to three CSV files.
pub struct CsvWriter {
    hourly:    Writer<File>,
    segments:  Writer<File>,
    shoulders: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut hourly = Writer::from_path(dir.join("hourly_arrivals.csv"))?;
        hourly.write_record(["hour", "forward", "backward", "total"])?;

        let mut segments = Writer::from_path(dir.join("segment_traversals.csv"))?;
        segments.write_record(["segment", "capacity", "forward", "backward", "total"])?;

        let mut shoulders = Writer::from_path(dir.join("shoulder_waits.csv"))?;
        shoulders.write_record([
            "shoulder", "max_waiting", "max_wait_ms", "mean_wait_ms", "vehicles_served",
        ])?;

        Ok(Self { hourly, segments, shoulders, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_hourly_arrivals(&mut self, rows: &[HourlyArrivalRow]) -> OutputResult<()> {
        for row in rows {
            self.hourly.write_record(&[
                row.hour.to_string(),
                row.forward.to_string(),
                row.backward.to_string(),
                row.total().to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_segment_traversals(&mut self, rows: &[SegmentTraversalRow]) -> OutputResult<()> {
        for row in rows {
            self.segments.write_record(&[
                row.segment.to_string(),
                row.capacity.to_string(),
                row.forward.to_string(),
                row.backward.to_string(),
                row.total().to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_shoulder_waits(&mut self, rows: &[ShoulderWaitRow]) -> OutputResult<()> {
        for row in rows {
            self.shoulders.write_record(&[
                row.shoulder.clone(),
                row.max_waiting.to_string(),
                format!("{:.3}", row.max_wait_ms),
                format!("{:.3}", row.mean_wait_ms),
                row.served.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.hourly.flush()?;
        self.segments.flush()?;
        self.shoulders.flush()?;
        Ok(())
    }
}
