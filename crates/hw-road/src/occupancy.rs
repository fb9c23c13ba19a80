//! Per-segment occupancy counters.

use hw_core::{SegmentId, VehicleClass};

use crate::{RoadError, RoadResult};

/// Class counts plus cumulative entry/exit totals for one segment.
///
/// Always lives inside its segment's lock; every mutation is followed by an
/// invariant check under the same guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub cars:    u32,
    pub trucks:  u32,
    /// Vehicles ever admitted.
    pub entered: u64,
    /// Vehicles ever released.
    pub exited:  u64,
}

impl Occupancy {
    /// Vehicles currently on the segment.
    #[inline]
    pub fn total(&self) -> u32 {
        self.cars + self.trucks
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn count(&self, class: VehicleClass) -> u32 {
        match class {
            VehicleClass::Car   => self.cars,
            VehicleClass::Truck => self.trucks,
        }
    }

    pub(crate) fn admit(&mut self, class: VehicleClass) {
        match class {
            VehicleClass::Car   => self.cars += 1,
            VehicleClass::Truck => self.trucks += 1,
        }
        self.entered += 1;
    }

    pub(crate) fn release(&mut self, segment: SegmentId, class: VehicleClass) -> RoadResult<()> {
        let slot = match class {
            VehicleClass::Car   => &mut self.cars,
            VehicleClass::Truck => &mut self.trucks,
        };
        if *slot == 0 {
            return Err(RoadError::Underflow {
                segment,
                class,
                cars:   self.cars,
                trucks: self.trucks,
            });
        }
        *slot -= 1;
        self.exited += 1;
        Ok(())
    }
}

/// A consistent view of one segment, read under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentSnapshot {
    pub segment:  SegmentId,
    pub capacity: u32,
    pub cars:     u32,
    pub trucks:   u32,
    pub entered:  u64,
    pub exited:   u64,
    /// Vehicles currently blocked in a blocking entry call.
    pub waiting:  u32,
}

impl SegmentSnapshot {
    #[inline]
    pub fn occupancy(&self) -> u32 {
        self.cars + self.trucks
    }

    /// `true` when every vehicle that entered has also left.
    pub fn is_drained(&self) -> bool {
        self.occupancy() == 0 && self.entered == self.exited
    }
}
