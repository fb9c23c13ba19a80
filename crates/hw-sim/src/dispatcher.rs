//! The `Dispatcher`: paced vehicle generation and the bounded drain.
//!
//! Each vehicle runs on its own named thread (`vehicle-N`).  The dispatcher
//! keeps one `JoinHandle` per task and reaps finished tasks as it goes, so the
//! handle list only ever holds vehicles that are still on the road.
//!
//! Generation stops when the configured vehicle count is reached, when the
//! wall budget runs out, or when a task reports an error.  The dispatcher
//! then waits at most the grace period for the remaining tasks.  Tasks still
//! running after that are detached and counted; they are never cancelled.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{info, warn};

use hw_core::{
    Direction, HighwayConfig, HourClock, SimRng, Vehicle, VehicleClass, VehicleId, VehicleRng,
};
use hw_road::Highway;

use crate::{SimError, SimResult, StatsCollector, Transit, Trip, VehicleTask};

// ── StopReason / DrainReport ──────────────────────────────────────────────────

/// Why vehicle generation ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// `total_vehicles()` were spawned.
    Quota,
    /// The wall budget ran out first.
    WallBudget,
    /// A task returned an error or panicked.
    Failed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Quota      => "quota reached",
            StopReason::WallBudget => "wall budget exhausted",
            StopReason::Failed     => "task failure",
        })
    }
}

/// Summary of one dispatcher run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrainReport {
    pub spawned:        u64,
    /// Tasks that reached `Completed` and were joined.
    pub completed:      u64,
    /// Tasks still on the road when the grace period ran out.
    pub still_running:  usize,
    /// Shoulder stops summed over all completed trips.
    pub shoulder_stops: u64,
    pub stop:           StopReason,
    /// Wall time from the start of generation to the end of the drain.
    pub elapsed:        Duration,
}

// ── DrainSignal ───────────────────────────────────────────────────────────────

/// Counts finished tasks and wakes the draining dispatcher.
#[derive(Default)]
struct DrainSignal {
    finished: Mutex<u64>,
    changed:  Condvar,
}

impl DrainSignal {
    /// Block until `target` tasks finished or `deadline` passes.  With no
    /// deadline, waits for all of them.  Returns the number of finished tasks.
    fn wait_for(&self, target: u64, deadline: Option<Instant>) -> u64 {
        let mut finished = self.finished.lock();
        while *finished < target {
            match deadline {
                Some(at) => {
                    if self.changed.wait_until(&mut finished, at).timed_out() {
                        break;
                    }
                }
                None => self.changed.wait(&mut finished),
            }
        }
        *finished
    }
}

/// Created first thing on each task thread; counts the task as finished when
/// dropped, including on panic.
struct FinishGuard(Arc<DrainSignal>);

impl Drop for FinishGuard {
    fn drop(&mut self) {
        *self.0.finished.lock() += 1;
        self.0.changed.notify_all();
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

pub struct Dispatcher<C: StatsCollector> {
    config:         HighwayConfig,
    highway:        Arc<Highway>,
    collector:      Arc<C>,
    transit:        Transit,
    clock:          HourClock,
    rng:            SimRng,
    next_id:        u32,
    tasks:          Vec<(VehicleId, JoinHandle<SimResult<Trip>>)>,
    signal:         Arc<DrainSignal>,
    spawned:        u64,
    completed:      u64,
    shoulder_stops: u64,
    failure:        Option<SimError>,
}

impl<C: StatsCollector> Dispatcher<C> {
    /// The hour clock starts now; [`run`](Self::run) restarts it.
    pub fn new(
        config:    HighwayConfig,
        highway:   Arc<Highway>,
        collector: Arc<C>,
        transit:   Transit,
    ) -> Self {
        Self {
            clock: HourClock::start(config.secs_per_hour),
            rng: SimRng::new(config.seed),
            config,
            highway,
            collector,
            transit,
            next_id: 1,
            tasks: Vec::new(),
            signal: Arc::new(DrainSignal::default()),
            spawned: 0,
            completed: 0,
            shoulder_stops: 0,
            failure: None,
        }
    }

    /// Create a vehicle and start its task on a new thread.
    pub fn spawn_vehicle(
        &mut self,
        class:     VehicleClass,
        direction: Direction,
    ) -> SimResult<VehicleId> {
        let id = VehicleId(self.next_id);
        self.next_id += 1;

        let vehicle = Vehicle::new(id, class, direction);
        let task = VehicleTask::new(
            vehicle,
            VehicleRng::new(self.config.seed, id),
            self.transit,
            self.clock,
            Arc::clone(&self.highway),
            Arc::clone(&self.collector),
        );
        let signal = Arc::clone(&self.signal);

        let handle = thread::Builder::new()
            .name(format!("vehicle-{}", id.0))
            .spawn(move || {
                let _finished = FinishGuard(signal);
                task.run()
            })
            .map_err(|source| SimError::Spawn { vehicle: id, source })?;

        self.tasks.push((id, handle));
        self.spawned += 1;
        Ok(id)
    }

    /// Generate traffic at the configured rate, then drain.
    ///
    /// Returns the first task error, if any, after the drain.
    pub fn run(&mut self) -> SimResult<DrainReport> {
        self.clock = HourClock::start(self.config.secs_per_hour);
        let started = self.clock.started();
        let total = self.config.total_vehicles();
        let budget = self.config.wall_budget();

        info!(
            vehicles = total,
            budget = ?budget,
            rate = self.config.vehicles_per_hour,
            "dispatcher started"
        );

        let mut next_at = started;
        let stop = loop {
            if self.spawned >= total {
                break StopReason::Quota;
            }
            if next_at.duration_since(started) >= budget {
                break StopReason::WallBudget;
            }
            let now = Instant::now();
            if next_at > now {
                thread::sleep(next_at - now);
            }

            let (class, direction) = self.next_vehicle();
            if let Err(e) = self.spawn_vehicle(class, direction) {
                self.fail(e);
            }
            self.reap();
            if self.failure.is_some() {
                break StopReason::Failed;
            }
            match next_at.checked_add(self.next_gap()) {
                Some(at) => next_at = at,
                None     => break StopReason::WallBudget,
            }
        };

        info!(
            spawned = self.spawned,
            in_flight = self.tasks.len(),
            reason = %stop,
            "generation finished"
        );

        let grace = self.config.grace_period();
        let still_running = self.drain(grace);
        let report = DrainReport {
            spawned:        self.spawned,
            completed:      self.completed,
            still_running,
            shoulder_stops: self.shoulder_stops,
            stop,
            elapsed:        started.elapsed(),
        };
        info!(
            completed = report.completed,
            still_running = report.still_running,
            elapsed = ?report.elapsed,
            "drain finished"
        );

        match self.failure.take() {
            Some(e) => Err(e),
            None    => Ok(report),
        }
    }

    /// Wait up to `grace` for every spawned task, join the finished ones and
    /// detach the rest.  Returns how many were still running.
    pub fn drain(&mut self, grace: Duration) -> usize {
        // A grace period past the end of the clock means no deadline.
        let deadline = Instant::now().checked_add(grace);
        let finished = self.signal.wait_for(self.spawned, deadline);

        if finished >= self.spawned {
            for (id, handle) in std::mem::take(&mut self.tasks) {
                self.settle(id, handle);
            }
        } else {
            self.reap();
        }

        let stragglers = std::mem::take(&mut self.tasks);
        if !stragglers.is_empty() {
            warn!(
                count = stragglers.len(),
                grace = ?grace,
                "vehicles still on the road after the grace period"
            );
        }
        stragglers.len()
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Tasks spawned and not yet joined.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    pub fn highway(&self) -> &Arc<Highway> {
        &self.highway
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn next_vehicle(&mut self) -> (VehicleClass, Direction) {
        let class = if self.rng.gen_bool(self.config.truck_ratio) {
            VehicleClass::Truck
        } else {
            VehicleClass::Car
        };
        let direction = if self.rng.gen_bool(self.config.forward_ratio) {
            Direction::Forward
        } else {
            Direction::Backward
        };
        (class, direction)
    }

    /// Mean inter-arrival gap scaled by a uniform factor in `1 ± jitter`.
    fn next_gap(&mut self) -> Duration {
        let mean = self.config.mean_interarrival();
        let jitter = self.config.arrival_jitter;
        let factor = self.rng.gen_range((1.0 - jitter)..=(1.0 + jitter));
        Duration::try_from_secs_f64(mean.as_secs_f64() * factor).unwrap_or(Duration::MAX)
    }

    /// Join every task whose thread has finished.
    fn reap(&mut self) {
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].1.is_finished() {
                let (id, handle) = self.tasks.swap_remove(i);
                self.settle(id, handle);
            } else {
                i += 1;
            }
        }
    }

    fn settle(&mut self, id: VehicleId, handle: JoinHandle<SimResult<Trip>>) {
        match handle.join() {
            Ok(Ok(trip)) => {
                self.completed += 1;
                self.shoulder_stops += trip.shoulder_stops as u64;
            }
            Ok(Err(e)) => self.fail(e),
            Err(_)     => self.fail(SimError::TaskPanicked(id)),
        }
    }

    /// Keep the first failure only.
    fn fail(&mut self, error: SimError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }
}
