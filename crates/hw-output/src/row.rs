//! Report row types and the `StatsReport` that bundles them.

use std::time::Duration;

use hw_road::Highway;

use crate::TrafficStats;

/// Arrivals during one hour of the simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyArrivalRow {
    pub hour:     u8,
    pub forward:  u64,
    pub backward: u64,
}

impl HourlyArrivalRow {
    pub fn total(&self) -> u64 {
        self.forward + self.backward
    }
}

/// Admissions to one segment over the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTraversalRow {
    /// 1-based segment number.
    pub segment:  u32,
    pub capacity: u32,
    pub forward:  u64,
    pub backward: u64,
}

impl SegmentTraversalRow {
    pub fn total(&self) -> u64 {
        self.forward + self.backward
    }
}

/// Wait statistics for one shoulder.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoulderWaitRow {
    /// Adjacent segment numbers, e.g. `"1-2"`.
    pub shoulder:     String,
    pub max_waiting:  u32,
    pub max_wait_ms:  f64,
    /// Zero when nobody waited.
    pub mean_wait_ms: f64,
    pub served:       u64,
}

/// Everything printed and exported at the end of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    /// One row per hour of day, `00:00` first.
    pub hourly:         Vec<HourlyArrivalRow>,
    pub segments:       Vec<SegmentTraversalRow>,
    pub shoulders:      Vec<ShoulderWaitRow>,
    /// Vehicles that joined the highway over the whole day.
    pub total_vehicles: u64,
}

impl StatsReport {
    /// Combine the collector's counters with the highway's own segment and
    /// shoulder state.
    pub fn build(stats: &TrafficStats, highway: &Highway) -> Self {
        let hourly: Vec<HourlyArrivalRow> = stats
            .hourly_arrivals()
            .iter()
            .enumerate()
            .map(|(h, [forward, backward])| HourlyArrivalRow {
                hour:     h as u8,
                forward:  *forward,
                backward: *backward,
            })
            .collect();

        let traversals = stats.segment_traversals();
        let segments = highway
            .snapshots()
            .iter()
            .map(|snap| {
                let [forward, backward] =
                    traversals.get(snap.segment.index()).copied().unwrap_or_default();
                SegmentTraversalRow {
                    segment:  snap.segment.0 + 1,
                    capacity: snap.capacity,
                    forward,
                    backward,
                }
            })
            .collect();

        let waits = stats.shoulder_waits();
        let shoulders = highway
            .shoulder_stats()
            .iter()
            .enumerate()
            .map(|(i, sh)| {
                let tally = waits.get(i).copied().unwrap_or_default();
                ShoulderWaitRow {
                    shoulder:     format!("{}-{}", i + 1, i + 2),
                    max_waiting:  sh.max_waiting,
                    max_wait_ms:  millis(tally.max),
                    mean_wait_ms: tally.mean().map_or(0.0, millis),
                    served:       tally.served,
                }
            })
            .collect();

        let total_vehicles = hourly.iter().map(HourlyArrivalRow::total).sum();
        Self { hourly, segments, shoulders, total_vehicles }
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}
