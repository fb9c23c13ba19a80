//! Vehicle identity, class and direction of travel.
//!
//! A [`Vehicle`] is immutable once created.  Its [`Route`] is derived from
//! the direction alone: forward traffic visits the segments in ascending
//! order, backward traffic in descending order.

use crate::{SegmentId, VehicleId};

/// The occupancy class of a vehicle.  Only the shared segment cares.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleClass {
    Car,
    Truck,
}

impl VehicleClass {
    /// Human-readable label, useful for CSV column values and log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleClass::Car   => "car",
            VehicleClass::Truck => "truck",
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of travel along the linear highway.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Segment 1 → segment N.
    Forward,
    /// Segment N → segment 1.
    Backward,
}

impl Direction {
    /// Both directions, in report column order.
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Backward];

    /// Column index used by per-direction counter arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Forward  => 0,
            Direction::Backward => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward  => "forward",
            Direction::Backward => "backward",
        }
    }

    /// The ordered segments a vehicle travelling this way visits on a
    /// highway of `segment_count` segments.
    pub fn route(self, segment_count: usize) -> Route {
        let ascending = (0..segment_count as u32).map(SegmentId);
        let segments = match self {
            Direction::Forward  => ascending.collect(),
            Direction::Backward => ascending.rev().collect(),
        };
        Route { segments }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed, ordered sequence of segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    segments: Vec<SegmentId>,
}

impl Route {
    #[inline]
    pub fn segments(&self) -> &[SegmentId] {
        &self.segments
    }

    pub fn first(&self) -> Option<SegmentId> {
        self.segments.first().copied()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Consecutive `(current, next)` pairs, one per segment boundary crossed.
    pub fn hops(&self) -> impl Iterator<Item = (SegmentId, SegmentId)> + '_ {
        self.segments.windows(2).map(|w| (w[0], w[1]))
    }
}

/// A single vehicle.  Owned by exactly one vehicle task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Vehicle {
    pub id:        VehicleId,
    pub class:     VehicleClass,
    pub direction: Direction,
}

impl Vehicle {
    pub fn new(id: VehicleId, class: VehicleClass, direction: Direction) -> Self {
        Self { id, class, direction }
    }

    /// The vehicle's route on a highway of `segment_count` segments.
    pub fn route(&self, segment_count: usize) -> Route {
        self.direction.route(segment_count)
    }
}
