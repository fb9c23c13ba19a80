//! Plain segments: admission by free slot, regardless of class.

use parking_lot::{Condvar, Mutex};
use tracing::{error, trace};

use hw_core::{SegmentId, VehicleClass};

use crate::occupancy::{Occupancy, SegmentSnapshot};
use crate::{RoadError, RoadResult};

struct PlainState {
    occupancy: Occupancy,
    /// Callers currently parked in [`PlainSegment::enter`].
    waiting:   u32,
}

/// A road section that admits any vehicle while `occupancy < capacity`.
///
/// Blocked callers park on a single `vacancy` condition; each release wakes
/// at most one of them.  Wake order is unspecified.
pub struct PlainSegment {
    id:       SegmentId,
    capacity: u32,
    state:    Mutex<PlainState>,
    vacancy:  Condvar,
}

impl PlainSegment {
    /// `capacity` must be positive; [`Highway`](crate::Highway) validates it.
    pub fn new(id: SegmentId, capacity: u32) -> Self {
        Self {
            id,
            capacity,
            state: Mutex::new(PlainState {
                occupancy: Occupancy::default(),
                waiting:   0,
            }),
            vacancy: Condvar::new(),
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

    /// Take a slot if one is free.  Never blocks.
    pub fn try_enter(&self, class: VehicleClass) -> RoadResult<bool> {
        let mut state = self.state.lock();
        if state.occupancy.total() >= self.capacity {
            return Ok(false);
        }
        self.admit(&mut state.occupancy, class)?;
        Ok(true)
    }

    /// Block until a slot is free, then take it.
    pub fn enter(&self, class: VehicleClass) -> RoadResult<()> {
        let mut state = self.state.lock();
        state.waiting += 1;
        while state.occupancy.total() >= self.capacity {
            self.vacancy.wait(&mut state);
        }
        state.waiting -= 1;
        self.admit(&mut state.occupancy, class)
    }

    /// Give a slot back and wake one parked caller.
    pub fn exit(&self, class: VehicleClass) -> RoadResult<()> {
        let mut state = self.state.lock();
        if let Err(e) = state.occupancy.release(self.id, class) {
            error!(segment = %self.id, %class, "release without occupant: {e}");
            return Err(e);
        }
        trace!(
            segment = %self.id,
            %class,
            occupancy = state.occupancy.total(),
            capacity = self.capacity,
            "left"
        );
        if state.waiting > 0 {
            self.vacancy.notify_one();
        }
        Ok(())
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
            waiting:  state.waiting,
        }
    }

    /// Count the vehicle in, then re-check the capacity invariant under the
    /// same guard.
    fn admit(&self, occupancy: &mut Occupancy, class: VehicleClass) -> RoadResult<()> {
        occupancy.admit(class);
        let total = occupancy.total();
        if total > self.capacity {
            error!(segment = %self.id, occupancy = total, capacity = self.capacity, "capacity exceeded");
            return Err(RoadError::CapacityExceeded {
                segment:   self.id,
                occupancy: total,
                capacity:  self.capacity,
            });
        }
        trace!(segment = %self.id, %class, occupancy = total, capacity = self.capacity, "entered");
        Ok(())
    }
}
