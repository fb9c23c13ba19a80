//! `TrafficStats`: the counting [`StatsCollector`].

use std::time::Duration;

use parking_lot::Mutex;

use hw_core::{Direction, HOURS_PER_DAY, HighwayConfig, SegmentId, ShoulderId, SimHour};
use hw_sim::StatsCollector;

/// Completed waits on one shoulder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaitTally {
    pub served: u64,
    pub total:  Duration,
    pub max:    Duration,
}

impl WaitTally {
    pub fn mean(&self) -> Option<Duration> {
        if self.served == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(self.total.as_secs_f64() / self.served as f64))
    }
}

struct Counters {
    /// `[hour][direction]`
    hourly:     [[u64; 2]; HOURS_PER_DAY],
    /// `[segment][direction]`
    traversals: Vec<[u64; 2]>,
    waits:      Vec<WaitTally>,
}

/// Run-wide traffic counters shared by every vehicle task.
///
/// One lock guards all counters; each hook holds it for a single increment.
/// Events for ids outside the highway the stats were sized for are dropped.
pub struct TrafficStats {
    counters: Mutex<Counters>,
}

impl TrafficStats {
    pub fn new(segment_count: usize, shoulder_count: usize) -> Self {
        Self {
            counters: Mutex::new(Counters {
                hourly:     [[0; 2]; HOURS_PER_DAY],
                traversals: vec![[0; 2]; segment_count],
                waits:      vec![WaitTally::default(); shoulder_count],
            }),
        }
    }

    /// Sized for the highway `config` describes.
    pub fn for_config(config: &HighwayConfig) -> Self {
        Self::new(config.segment_count(), config.shoulder_count())
    }

    /// Arrivals per hour of day, indexed `[hour][Direction::index()]`.
    pub fn hourly_arrivals(&self) -> [[u64; 2]; HOURS_PER_DAY] {
        self.counters.lock().hourly
    }

    /// Admissions per segment, indexed `[segment][Direction::index()]`.
    pub fn segment_traversals(&self) -> Vec<[u64; 2]> {
        self.counters.lock().traversals.clone()
    }

    pub fn shoulder_waits(&self) -> Vec<WaitTally> {
        self.counters.lock().waits.clone()
    }

    /// Vehicles that joined the highway, over all hours and directions.
    pub fn total_arrivals(&self) -> u64 {
        self.counters.lock().hourly.iter().flatten().sum()
    }
}

impl StatsCollector for TrafficStats {
    fn record_segment_traversal(&self, segment: SegmentId, direction: Direction) {
        let mut c = self.counters.lock();
        if let Some(row) = c.traversals.get_mut(segment.index()) {
            row[direction.index()] += 1;
        }
    }

    fn record_shoulder_wait(&self, shoulder: ShoulderId, wait: Duration) {
        let mut c = self.counters.lock();
        if let Some(tally) = c.waits.get_mut(shoulder.index()) {
            tally.served += 1;
            tally.total += wait;
            tally.max = tally.max.max(wait);
        }
    }

    fn record_hourly_arrival(&self, direction: Direction, hour: SimHour) {
        let mut c = self.counters.lock();
        c.hourly[hour.index() % HOURS_PER_DAY][direction.index()] += 1;
    }
}
