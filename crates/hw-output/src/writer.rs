//! The `OutputWriter` trait implemented by report backends.

use crate::{
    HourlyArrivalRow, OutputResult, SegmentTraversalRow, ShoulderWaitRow, StatsReport,
};

/// Trait implemented by report writers.
pub trait OutputWriter {
    /// Write the per-hour arrival table.
    fn write_hourly_arrivals(&mut self, rows: &[HourlyArrivalRow]) -> OutputResult<()>;

    /// Write the per-segment traversal table.
    fn write_segment_traversals(&mut self, rows: &[SegmentTraversalRow]) -> OutputResult<()>;

    /// Write the per-shoulder wait table.
    fn write_shoulder_waits(&mut self, rows: &[ShoulderWaitRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;

    /// Write every table of `report`, then [`finish`](Self::finish).
    fn write_report(&mut self, report: &StatsReport) -> OutputResult<()> {
        self.write_hourly_arrivals(&report.hourly)?;
        self.write_segment_traversals(&report.segments)?;
        self.write_shoulder_waits(&report.shoulders)?;
        self.finish()
    }
}
