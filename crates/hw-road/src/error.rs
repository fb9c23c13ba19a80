//! Road-subsystem error type.
//!
//! The first three variants are protocol bugs, not runtime conditions: they
//! are detected under the offending segment's lock right after a counter
//! mutation and abort the run.

use thiserror::Error;

use hw_core::{HwError, SegmentId, ShoulderId, VehicleClass};

/// Errors produced by `hw-road`.
#[derive(Debug, Error)]
pub enum RoadError {
    #[error("{segment}: occupancy {occupancy} exceeds capacity {capacity}")]
    CapacityExceeded {
        segment:   SegmentId,
        occupancy: u32,
        capacity:  u32,
    },

    #[error("{segment}: class exclusion violated ({cars} cars, {trucks} trucks)")]
    ClassExclusion {
        segment: SegmentId,
        cars:    u32,
        trucks:  u32,
    },

    #[error("{segment}: a {class} left but none was present ({cars} cars, {trucks} trucks)")]
    Underflow {
        segment: SegmentId,
        class:   VehicleClass,
        cars:    u32,
        trucks:  u32,
    },

    #[error("{0}: a vehicle stopped waiting but none was registered")]
    ShoulderUnderflow(ShoulderId),

    #[error("{0} not found on this highway")]
    UnknownSegment(SegmentId),

    #[error("{0} not found on this highway")]
    UnknownShoulder(ShoulderId),

    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: SegmentId, to: SegmentId },

    #[error(transparent)]
    Config(#[from] HwError),
}

pub type RoadResult<T> = Result<T, RoadError>;

impl RoadError {
    /// `true` for the variants that indicate a broken admission protocol.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            RoadError::CapacityExceeded { .. }
                | RoadError::ClassExclusion { .. }
                | RoadError::Underflow { .. }
                | RoadError::ShoulderUnderflow(_)
        )
    }
}
