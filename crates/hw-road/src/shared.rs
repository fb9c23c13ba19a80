//! The shared segment: cars and trucks never co-occupy it.
//!
//! # Admission rule
//!
//! ```text
//! car   may enter  iff  trucks == 0 && cars   < limits.cars   && no truck is waiting
//! truck may enter  iff  cars   == 0 && trucks < limits.trucks
//! ```
//!
//! With the default limits (2 cars / 1 truck) a truck needs the segment to
//! be completely empty.
//!
//! # Waiting and wake-up
//!
//! Each class parks on its own condition variable; both share the counter
//! lock, so a waiter re-checking its predicate always sees the counts the
//! releasing vehicle left behind.  On every release:
//!
//! 1. If a truck is waiting, wake exactly one truck, and only when a truck
//!    could now be admitted.  Cars are not woken.
//! 2. Otherwise, if cars are waiting and no truck is on the segment, wake
//!    every waiting car; each re-checks and the losers park again.
//!
//! Trucks take priority: while a truck waits, new cars are refused, so the
//! cars already on the segment drain and the truck gets in.  Cars already on
//! the segment are never evicted.

use parking_lot::{Condvar, Mutex};
use tracing::{error, trace};

use hw_core::{ClassLimits, SegmentId, VehicleClass};

use crate::occupancy::{Occupancy, SegmentSnapshot};
use crate::{RoadError, RoadResult};

struct SharedState {
    occupancy:      Occupancy,
    waiting_cars:   u32,
    waiting_trucks: u32,
}

impl SharedState {
    fn waiting_mut(&mut self, class: VehicleClass) -> &mut u32 {
        match class {
            VehicleClass::Car   => &mut self.waiting_cars,
            VehicleClass::Truck => &mut self.waiting_trucks,
        }
    }
}

/// A segment whose admission depends on the class of the requester and of
/// the current occupants.
pub struct SharedSegment {
    id:         SegmentId,
    capacity:   u32,
    limits:     ClassLimits,
    state:      Mutex<SharedState>,
    car_turn:   Condvar,
    truck_turn: Condvar,
}

impl SharedSegment {
    /// `capacity` must be at least `max(limits.cars, limits.trucks)`;
    /// [`Highway`](crate::Highway) validates it.
    pub fn new(id: SegmentId, capacity: u32, limits: ClassLimits) -> Self {
        Self {
            id,
            capacity,
            limits,
            state: Mutex::new(SharedState {
                occupancy:      Occupancy::default(),
                waiting_cars:   0,
                waiting_trucks: 0,
            }),
            car_turn:   Condvar::new(),
            truck_turn: Condvar::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> SegmentId {
        self.id
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    #[inline]
    pub fn limits(&self) -> ClassLimits {
        self.limits
    }

    /// Enter if the admission rule allows it right now.  Never blocks.
    pub fn try_enter(&self, class: VehicleClass) -> RoadResult<bool> {
        let mut state = self.state.lock();
        if !self.admits(&state, class) {
            return Ok(false);
        }
        self.admit(&mut state.occupancy, class)?;
        Ok(true)
    }

    /// Register as a waiter of `class`, park on that class's condition until
    /// the admission rule holds, then enter.
    pub fn wait_and_enter(&self, class: VehicleClass) -> RoadResult<()> {
        let mut state = self.state.lock();
        *state.waiting_mut(class) += 1;
        while !self.admits(&state, class) {
            match class {
                VehicleClass::Car   => self.car_turn.wait(&mut state),
                VehicleClass::Truck => self.truck_turn.wait(&mut state),
            }
        }
        *state.waiting_mut(class) -= 1;
        self.admit(&mut state.occupancy, class)
    }

    /// Leave the segment and wake whichever waiters can now make progress.
    pub fn exit(&self, class: VehicleClass) -> RoadResult<()> {
        let mut state = self.state.lock();
        if let Err(e) = state.occupancy.release(self.id, class) {
            error!(segment = %self.id, %class, "release without occupant: {e}");
            return Err(e);
        }
        let occ = state.occupancy;
        trace!(
            segment = %self.id,
            %class,
            cars = occ.cars,
            trucks = occ.trucks,
            waiting_cars = state.waiting_cars,
            waiting_trucks = state.waiting_trucks,
            "left"
        );

        if state.waiting_trucks > 0 {
            if occ.cars == 0 && occ.trucks < self.limits.trucks {
                self.truck_turn.notify_one();
            }
        } else if state.waiting_cars > 0 && occ.trucks == 0 {
            self.car_turn.notify_all();
        }
        Ok(())
    }

    /// `(waiting_cars, waiting_trucks)` right now.
    pub fn waiting(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.waiting_cars, state.waiting_trucks)
    }

    pub fn snapshot(&self) -> SegmentSnapshot {
        let state = self.state.lock();
        SegmentSnapshot {
            segment:  self.id,
            capacity: self.capacity,
            cars:     state.occupancy.cars,
            trucks:   state.occupancy.trucks,
            entered:  state.occupancy.entered,
            exited:   state.occupancy.exited,
            waiting:  state.waiting_cars + state.waiting_trucks,
        }
    }

    fn admits(&self, state: &SharedState, class: VehicleClass) -> bool {
        let occ = &state.occupancy;
        if occ.total() >= self.capacity {
            return false;
        }
        match class {
            VehicleClass::Car => {
                occ.trucks == 0 && occ.cars < self.limits.cars && state.waiting_trucks == 0
            }
            VehicleClass::Truck => occ.cars == 0 && occ.trucks < self.limits.trucks,
        }
    }

    fn admit(&self, occupancy: &mut Occupancy, class: VehicleClass) -> RoadResult<()> {
        occupancy.admit(class);
        let (cars, trucks) = (occupancy.cars, occupancy.trucks);

        let exclusive = (cars <= self.limits.cars && trucks == 0)
            || (trucks <= self.limits.trucks && cars == 0);
        if !exclusive {
            error!(segment = %self.id, cars, trucks, "class exclusion violated");
            return Err(RoadError::ClassExclusion { segment: self.id, cars, trucks });
        }
        if occupancy.total() > self.capacity {
            error!(segment = %self.id, occupancy = occupancy.total(), capacity = self.capacity, "capacity exceeded");
            return Err(RoadError::CapacityExceeded {
                segment:   self.id,
                occupancy: occupancy.total(),
                capacity:  self.capacity,
            });
        }
        trace!(segment = %self.id, %class, cars, trucks, "entered");
        Ok(())
    }
}
