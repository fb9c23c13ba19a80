//! `VehicleTask`: one vehicle's walk along its route.
//!
//! # State machine
//!
//! ```text
//! Entering(s) ──admitted──▶ Traveling(s) ──transit──▶ Departing(s)
//!     │                                                  │
//!     └──refused──▶ WaitingShoulder(s', s) ──admitted──┐ ├──▶ Entering(next)
//!                                                     │ └──▶ Completed
//!                          Traveling(s) ◀─────────────┘
//! ```
//!
//! A vehicle releases its current segment before it asks for the next one,
//! so it never holds more than one segment and never waits while holding
//! one.  The first segment has no shoulder in front of it: a refused vehicle
//! blocks at the entrance.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use hw_core::{HourClock, HighwayConfig, Route, SegmentId, Vehicle, VehicleRng};
use hw_road::{Admission, Highway};

use crate::{SimResult, StatsCollector};

// ── Transit ───────────────────────────────────────────────────────────────────

/// How long a vehicle spends on each segment: `unit * k`, `k` uniform in
/// `min_units..=max_units`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transit {
    pub unit:      Duration,
    pub min_units: u32,
    pub max_units: u32,
}

impl Transit {
    pub fn from_config(config: &HighwayConfig) -> Self {
        Self {
            unit:      config.transit_unit(),
            min_units: config.transit_units.0,
            max_units: config.transit_units.1,
        }
    }

    /// No transit delay at all; useful for tests.
    pub const INSTANT: Transit = Transit { unit: Duration::ZERO, min_units: 0, max_units: 0 };

    pub fn sample(&self, rng: &mut VehicleRng) -> Duration {
        let k = rng.gen_range(self.min_units..=self.max_units.max(self.min_units));
        self.unit * k
    }
}

// ── TaskState ─────────────────────────────────────────────────────────────────

/// Where a vehicle task is in its route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    /// Asking `segment` for admission without blocking.
    Entering(SegmentId),
    /// Holding `segment` for the transit time.
    Traveling(SegmentId),
    /// Releasing `segment`.
    Departing(SegmentId),
    /// Parked on the shoulder before `to`, blocked in a segment's `enter`.
    WaitingShoulder { from: SegmentId, to: SegmentId },
    /// Released the last segment.
    Completed,
}

// ── Trip ──────────────────────────────────────────────────────────────────────

/// What a finished task reports back to the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    pub vehicle:        Vehicle,
    /// Segments entered, in order.
    pub visited:        Vec<SegmentId>,
    /// Number of shoulder stops.
    pub shoulder_stops: u32,
    /// Sum of all shoulder waits.
    pub total_wait:     Duration,
}

// ── VehicleTask ───────────────────────────────────────────────────────────────

/// The per-vehicle routine.  Owns its vehicle; shares the highway and the
/// collector with every other task.
pub struct VehicleTask<C: StatsCollector> {
    vehicle:   Vehicle,
    route:     Route,
    /// Position of the current segment in `route`.
    leg:       usize,
    rng:       VehicleRng,
    transit:   Transit,
    clock:     HourClock,
    highway:   Arc<Highway>,
    collector: Arc<C>,
    trip:      Trip,
}

impl<C: StatsCollector> VehicleTask<C> {
    pub fn new(
        vehicle:   Vehicle,
        rng:       VehicleRng,
        transit:   Transit,
        clock:     HourClock,
        highway:   Arc<Highway>,
        collector: Arc<C>,
    ) -> Self {
        let route = vehicle.route(highway.segment_count());
        Self {
            vehicle,
            route,
            leg: 0,
            rng,
            transit,
            clock,
            highway,
            collector,
            trip: Trip {
                vehicle,
                visited:        Vec::new(),
                shoulder_stops: 0,
                total_wait:     Duration::ZERO,
            },
        }
    }

    /// Drive the state machine from the first segment to `Completed`.
    pub fn run(self) -> SimResult<Trip> {
        let Some(first) = self.route.first() else {
            return Ok(self.trip);
        };
        let v = self.vehicle;
        debug!(vehicle = %v.id, class = %v.class, direction = %v.direction, "joined the highway");
        self.collector.record_hourly_arrival(v.direction, self.clock.current_hour());

        self.run_from(TaskState::Entering(first))
    }

    /// Drive the state machine from `state` to `Completed`.
    pub fn run_from(mut self, mut state: TaskState) -> SimResult<Trip> {
        while state != TaskState::Completed {
            state = self.step(state)?;
        }

        let v = self.vehicle;
        debug!(
            vehicle = %v.id,
            stops = self.trip.shoulder_stops,
            wait = ?self.trip.total_wait,
            "left the highway"
        );
        Ok(self.trip)
    }

    /// Perform one transition.
    pub fn step(&mut self, state: TaskState) -> SimResult<TaskState> {
        let class = self.vehicle.class;
        let highway = Arc::clone(&self.highway);
        match state {
            TaskState::Entering(segment) => {
                let road = highway.segment(segment)?;
                if road.try_enter(class)? {
                    self.admitted(segment);
                    return Ok(TaskState::Traveling(segment));
                }
                if self.leg == 0 {
                    road.enter(class)?;
                    self.admitted(segment);
                    return Ok(TaskState::Traveling(segment));
                }
                let from = self.route.segments()[self.leg - 1];
                Ok(TaskState::WaitingShoulder { from, to: segment })
            }

            TaskState::WaitingShoulder { from, to } => {
                let shoulder = highway.shoulder_between(from, to)?;
                let ticket = shoulder.enter_waiting();
                highway.segment(to)?.enter(class)?;
                let wait = ticket.elapsed();
                shoulder.exit_waiting(wait)?;

                self.collector.record_shoulder_wait(ticket.shoulder, wait);
                self.trip.shoulder_stops += 1;
                self.trip.total_wait += wait;
                self.admitted(to);
                Ok(TaskState::Traveling(to))
            }

            TaskState::Traveling(segment) => {
                let transit = self.transit.sample(&mut self.rng);
                if !transit.is_zero() {
                    std::thread::sleep(transit);
                }
                Ok(TaskState::Departing(segment))
            }

            TaskState::Departing(segment) => {
                highway.segment(segment)?.exit(class)?;
                self.leg += 1;
                Ok(match self.route.segments().get(self.leg) {
                    Some(&next) => TaskState::Entering(next),
                    None        => TaskState::Completed,
                })
            }

            TaskState::Completed => Ok(TaskState::Completed),
        }
    }

    fn admitted(&mut self, segment: SegmentId) {
        self.trip.visited.push(segment);
        self.collector.record_segment_traversal(segment, self.vehicle.direction);
    }
}
