//! Task, dispatcher and builder tests for hw-sim.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use hw_core::{
    Direction, HighwayConfig, HourClock, SegmentId, ShoulderId, SimHour, Vehicle, VehicleClass,
    VehicleId, VehicleRng,
};
use hw_road::{Admission, Highway};

use crate::{StatsCollector, TaskState, Transit, VehicleTask};

// ── Helpers ───────────────────────────────────────────────────────────────────

const CAR: VehicleClass = VehicleClass::Car;
const TRUCK: VehicleClass = VehicleClass::Truck;

/// Records every hook call.
#[derive(Default)]
struct Recording {
    traversals: Mutex<Vec<(SegmentId, Direction)>>,
    waits:      Mutex<Vec<(ShoulderId, Duration)>>,
    arrivals:   AtomicU64,
}

impl StatsCollector for Recording {
    fn record_segment_traversal(&self, segment: SegmentId, direction: Direction) {
        self.traversals.lock().push((segment, direction));
    }

    fn record_shoulder_wait(&self, shoulder: ShoulderId, wait: Duration) {
        self.waits.lock().push((shoulder, wait));
    }

    fn record_hourly_arrival(&self, _direction: Direction, _hour: SimHour) {
        self.arrivals.fetch_add(1, Ordering::Relaxed);
    }
}

fn eventually(what: &str, cond: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

fn highway() -> Arc<Highway> {
    Arc::new(Highway::from_config(&HighwayConfig::default()).unwrap())
}

fn task(
    id:        u32,
    class:     VehicleClass,
    direction: Direction,
    highway:   &Arc<Highway>,
    collector: &Arc<Recording>,
) -> VehicleTask<Recording> {
    VehicleTask::new(
        Vehicle::new(VehicleId(id), class, direction),
        VehicleRng::new(42, VehicleId(id)),
        Transit::INSTANT,
        HourClock::start(1.0),
        Arc::clone(highway),
        Arc::clone(collector),
    )
}

/// 10 ms between arrivals, no jitter, 1–2 ms transit.
fn fast_config(vehicles_per_hour: u32, sim_hours: u32) -> HighwayConfig {
    HighwayConfig {
        vehicles_per_hour,
        sim_hours,
        secs_per_hour:     vehicles_per_hour as f64 * 0.01,
        arrival_jitter:    0.0,
        transit_unit_ms:   1,
        grace_period_secs: 10.0,
        ..HighwayConfig::default()
    }
}

// ── Transit ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod transit {
    use super::*;

    #[test]
    fn samples_stay_in_unit_multiples() {
        let transit = Transit { unit: Duration::from_millis(40), min_units: 1, max_units: 2 };
        let mut rng = VehicleRng::new(7, VehicleId(3));
        for _ in 0..200 {
            let d = transit.sample(&mut rng);
            assert!(
                d == Duration::from_millis(40) || d == Duration::from_millis(80),
                "unexpected transit {d:?}"
            );
        }
    }

    #[test]
    fn instant_is_zero() {
        let mut rng = VehicleRng::new(7, VehicleId(3));
        assert_eq!(Transit::INSTANT.sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn from_config_uses_unit_and_range() {
        let t = Transit::from_config(&HighwayConfig::default());
        assert_eq!(t.unit, Duration::from_millis(40));
        assert_eq!((t.min_units, t.max_units), (1, 2));
    }
}

// ── VehicleTask ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod task_states {
    use super::*;

    #[test]
    fn forward_trip_visits_every_segment_in_order() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        let trip = task(1, CAR, Direction::Forward, &hw, &stats).run().unwrap();

        let expected: Vec<SegmentId> = (0..4).map(SegmentId).collect();
        assert_eq!(trip.visited, expected);
        assert_eq!(trip.shoulder_stops, 0);
        assert!(hw.is_drained());
        assert_eq!(stats.arrivals.load(Ordering::Relaxed), 1);
        assert_eq!(stats.traversals.lock().len(), 4);
    }

    #[test]
    fn backward_trip_runs_in_reverse() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        let trip = task(2, TRUCK, Direction::Backward, &hw, &stats).run().unwrap();

        let expected: Vec<SegmentId> = (0..4).rev().map(SegmentId).collect();
        assert_eq!(trip.visited, expected);
        assert!(
            stats.traversals.lock().iter().all(|&(_, d)| d == Direction::Backward)
        );
    }

    #[test]
    fn single_steps_follow_the_state_machine() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        let mut t = task(3, CAR, Direction::Forward, &hw, &stats);

        let s = t.step(TaskState::Entering(SegmentId(0))).unwrap();
        assert_eq!(s, TaskState::Traveling(SegmentId(0)));
        assert_eq!(hw.segment(SegmentId(0)).unwrap().snapshot().cars, 1);

        let s = t.step(s).unwrap();
        assert_eq!(s, TaskState::Departing(SegmentId(0)));

        let s = t.step(s).unwrap();
        assert_eq!(s, TaskState::Entering(SegmentId(1)));
        assert!(hw.segment(SegmentId(0)).unwrap().snapshot().is_drained());
    }

    #[test]
    fn refused_vehicle_waits_on_the_shoulder() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        let shared = hw.segment(SegmentId(1)).unwrap();
        assert!(shared.try_enter(TRUCK).unwrap());

        let mut t = task(4, CAR, Direction::Forward, &hw, &stats);
        let mut s = TaskState::Entering(SegmentId(0));
        for _ in 0..3 {
            s = t.step(s).unwrap();
        }
        let s = t.step(s).unwrap();
        assert_eq!(
            s,
            TaskState::WaitingShoulder { from: SegmentId(0), to: SegmentId(1) }
        );

        let waiter = thread::spawn(move || t.step(s).map(|next| (next, t)));
        eventually("car on shoulder 1-2", || {
            hw.shoulder(ShoulderId(0)).unwrap().stats().waiting == 1
        });

        hw.segment(SegmentId(1)).unwrap().exit(TRUCK).unwrap();
        let (next, _t) = waiter.join().unwrap().unwrap();
        assert_eq!(next, TaskState::Traveling(SegmentId(1)));

        let sh = hw.shoulder(ShoulderId(0)).unwrap().stats();
        assert_eq!((sh.waiting, sh.max_waiting, sh.served), (0, 1, 1));
        let waits = stats.waits.lock();
        assert_eq!(waits.len(), 1);
        assert_eq!(waits[0].0, ShoulderId(0));
    }

    #[test]
    fn backward_wait_uses_lower_shoulder_index() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        // Segment index 2 holds one vehicle.
        assert!(hw.segment(SegmentId(2)).unwrap().try_enter(CAR).unwrap());

        let mut t = task(5, CAR, Direction::Backward, &hw, &stats);
        let mut s = TaskState::Entering(SegmentId(3));
        for _ in 0..4 {
            s = t.step(s).unwrap();
        }
        assert_eq!(
            s,
            TaskState::WaitingShoulder { from: SegmentId(3), to: SegmentId(2) }
        );

        let waiter = thread::spawn(move || t.run_from(s));
        eventually("car on shoulder 3-4", || {
            hw.shoulder(ShoulderId(2)).unwrap().stats().waiting == 1
        });
        hw.segment(SegmentId(2)).unwrap().exit(CAR).unwrap();
        waiter.join().unwrap().unwrap();

        assert_eq!(hw.shoulder(ShoulderId(2)).unwrap().stats().served, 1);
        assert!(hw.is_drained());
    }

    #[test]
    fn first_segment_refusal_blocks_without_shoulder() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        let first = hw.segment(SegmentId(3)).unwrap();
        for _ in 0..3 {
            assert!(first.try_enter(CAR).unwrap());
        }

        let mut t = task(6, TRUCK, Direction::Backward, &hw, &stats);
        let waiter = thread::spawn(move || t.step(TaskState::Entering(SegmentId(3))));
        eventually("truck at the entrance", || {
            hw.segment(SegmentId(3)).unwrap().snapshot().waiting == 1
        });
        assert!(hw.shoulder_stats().iter().all(|s| s.waiting == 0));

        hw.segment(SegmentId(3)).unwrap().exit(CAR).unwrap();
        assert_eq!(waiter.join().unwrap().unwrap(), TaskState::Traveling(SegmentId(3)));
        assert!(hw.shoulder_stats().iter().all(|s| s.served == 0));
    }

    #[test]
    fn truck_behind_two_cars_waits_on_the_shoulder() {
        let hw = highway();
        let stats = Arc::new(Recording::default());

        // Two forward cars occupy the shared segment.
        let mut cars: Vec<_> = [1, 2]
            .map(|id| {
                let mut t = task(id, CAR, Direction::Forward, &hw, &stats);
                let mut s = TaskState::Entering(SegmentId(0));
                for _ in 0..4 {
                    s = t.step(s).unwrap();
                }
                assert_eq!(s, TaskState::Traveling(SegmentId(1)));
                (t, s)
            })
            .into();
        assert_eq!(hw.segment(SegmentId(1)).unwrap().snapshot().cars, 2);

        // The truck behind them is refused and pulls over.
        let mut truck = task(3, TRUCK, Direction::Forward, &hw, &stats);
        let mut s = TaskState::Entering(SegmentId(0));
        for _ in 0..4 {
            s = truck.step(s).unwrap();
        }
        assert_eq!(
            s,
            TaskState::WaitingShoulder { from: SegmentId(0), to: SegmentId(1) }
        );
        let waiter = thread::spawn(move || truck.run_from(s));
        eventually("truck on shoulder 1-2", || {
            hw.shared_segment().unwrap().waiting() == (0, 1)
        });
        assert_eq!(hw.shoulder(ShoulderId(0)).unwrap().stats().waiting, 1);

        // One car leaves; the other still blocks the truck.
        let (mut first, s) = cars.remove(0);
        let s = first.step(s).unwrap();
        assert_eq!(first.step(s).unwrap(), TaskState::Entering(SegmentId(2)));
        thread::sleep(Duration::from_millis(20));
        let shared = hw.segment(SegmentId(1)).unwrap().snapshot();
        assert_eq!((shared.cars, shared.trucks), (1, 0));

        let (mut second, s) = cars.remove(0);
        let s = second.step(s).unwrap();
        assert_eq!(second.step(s).unwrap(), TaskState::Entering(SegmentId(2)));

        let trip = waiter.join().unwrap().unwrap();
        assert_eq!(trip.shoulder_stops, 1);
        assert_eq!(trip.visited, (0..4).map(SegmentId).collect::<Vec<_>>());

        let sh = hw.shoulder(ShoulderId(0)).unwrap().stats();
        assert_eq!((sh.waiting, sh.max_waiting, sh.served), (0, 1, 1));
        assert_eq!(stats.waits.lock().len(), 1);

        first.run_from(TaskState::Entering(SegmentId(2))).unwrap();
        second.run_from(TaskState::Entering(SegmentId(2))).unwrap();
        assert!(hw.is_drained());
        assert_eq!(hw.segment(SegmentId(1)).unwrap().snapshot().entered, 3);
    }

    #[test]
    fn completed_is_terminal() {
        let hw = highway();
        let stats = Arc::new(Recording::default());
        let mut t = task(7, CAR, Direction::Forward, &hw, &stats);
        assert_eq!(t.step(TaskState::Completed).unwrap(), TaskState::Completed);
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatcher {
    use super::*;
    use crate::{NoopCollector, SimBuilder, SimError, StopReason};

    #[test]
    fn vehicle_ids_start_at_one() {
        let sim = SimBuilder::new(fast_config(10, 1), Arc::new(NoopCollector))
            .transit(Transit::INSTANT)
            .build()
            .unwrap();
        let mut d = sim.dispatcher();
        assert_eq!(d.spawn_vehicle(CAR, Direction::Forward).unwrap(), VehicleId(1));
        assert_eq!(d.spawn_vehicle(TRUCK, Direction::Backward).unwrap(), VehicleId(2));

        assert_eq!(d.drain(Duration::from_secs(5)), 0);
        assert_eq!(d.completed(), 2);
        assert_eq!(d.in_flight(), 0);
        assert!(sim.highway().is_drained());
    }

    #[test]
    fn drain_counts_stragglers() {
        let config = HighwayConfig { capacities: vec![1, 2, 1, 1], ..fast_config(10, 1) };
        let sim = SimBuilder::new(config, Arc::new(NoopCollector)).build().unwrap();
        let entrance = sim.highway().segment(SegmentId(0)).unwrap();
        assert!(entrance.try_enter(CAR).unwrap());

        let mut d = sim.dispatcher();
        d.spawn_vehicle(CAR, Direction::Forward).unwrap();
        assert_eq!(d.drain(Duration::from_millis(50)), 1);
        assert_eq!(d.completed(), 0);

        // Let the detached vehicle finish.
        entrance.exit(CAR).unwrap();
        eventually("detached vehicle to leave", || sim.highway().is_drained());
    }

    #[test]
    fn full_run_conserves_vehicles() {
        let stats = Arc::new(Recording::default());
        let sim = SimBuilder::new(fast_config(20, 2), Arc::clone(&stats)).build().unwrap();
        let report = sim.run().unwrap();

        assert_eq!(report.stop, StopReason::Quota);
        assert_eq!(report.spawned, 40);
        assert_eq!(report.completed, 40);
        assert_eq!(report.still_running, 0);

        assert!(sim.highway().is_drained());
        for snap in sim.highway().snapshots() {
            assert_eq!(snap.entered, 40, "{}", snap.segment);
            assert_eq!(snap.entered, snap.exited);
        }
        assert_eq!(stats.arrivals.load(Ordering::Relaxed), 40);
        assert_eq!(stats.traversals.lock().len(), 160);

        let served: u64 = sim.highway().shoulder_stats().iter().map(|s| s.served).sum();
        assert_eq!(served, report.shoulder_stops);
        assert_eq!(stats.waits.lock().len() as u64, report.shoulder_stops);
    }

    #[test]
    fn zero_hours_spawns_nothing() {
        let sim = SimBuilder::new(fast_config(10, 0), Arc::new(NoopCollector)).build().unwrap();
        let report = sim.run().unwrap();
        assert_eq!(report.stop, StopReason::Quota);
        assert_eq!(report.spawned, 0);
    }

    struct Exploding;

    impl StatsCollector for Exploding {
        fn record_hourly_arrival(&self, _direction: Direction, _hour: SimHour) {
            panic!("collector failure");
        }
    }

    #[test]
    fn task_panic_aborts_the_run() {
        let sim = SimBuilder::new(fast_config(5, 1), Arc::new(Exploding)).build().unwrap();
        match sim.run() {
            Err(SimError::TaskPanicked(id)) => assert!(id.0 >= 1),
            other => panic!("expected a task panic, got {other:?}"),
        }
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use hw_road::RoadError;

    use crate::{NoopCollector, SimBuilder, SimError};

    #[test]
    fn invalid_config_is_rejected() {
        let config = HighwayConfig { capacities: vec![4, 0, 1, 3], ..HighwayConfig::default() };
        let result = SimBuilder::new(config, Arc::new(NoopCollector)).build();
        assert!(matches!(result, Err(SimError::Road(RoadError::Config(_)))));
    }

    #[test]
    fn unbounded_grace_period_is_rejected() {
        let config = HighwayConfig { grace_period_secs: 1e20, ..HighwayConfig::default() };
        let result = SimBuilder::new(config, Arc::new(NoopCollector)).build();
        assert!(matches!(result, Err(SimError::Road(RoadError::Config(_)))));
    }

    #[test]
    fn highway_matches_config() {
        let sim = SimBuilder::new(HighwayConfig::default(), Arc::new(NoopCollector))
            .build()
            .unwrap();
        assert_eq!(sim.highway().segment_count(), 4);
        assert_eq!(sim.highway().shoulder_count(), 3);
        assert!(sim.highway().shared_segment().is_some());
        assert_eq!(sim.transit, Transit::from_config(&sim.config));
    }

    #[test]
    fn transit_override_is_kept() {
        let sim = SimBuilder::new(HighwayConfig::default(), Arc::new(NoopCollector))
            .transit(Transit::INSTANT)
            .build()
            .unwrap();
        assert_eq!(sim.transit, Transit::INSTANT);
    }
}
