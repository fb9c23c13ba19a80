//! The `Admission` trait and the `Segment` enum that dispatches over both
//! segment kinds.

use hw_core::{SegmentId, VehicleClass};

use crate::occupancy::SegmentSnapshot;
use crate::{PlainSegment, RoadResult, SharedSegment};

/// Capacity acquisition and release for one road section.
///
/// Vehicle tasks only talk to segments through this trait, so the traversal
/// logic has no per-kind branching.
///
/// # Contract
///
/// - `try_enter` never blocks.
/// - `enter` blocks until admitted; it is woken only by some `exit` on the
///   same segment.
/// - A caller holding the segment never calls `try_enter`/`enter` on it again.
pub trait Admission {
    fn id(&self) -> SegmentId;

    fn try_enter(&self, class: VehicleClass) -> RoadResult<bool>;

    fn enter(&self, class: VehicleClass) -> RoadResult<()>;

    fn exit(&self, class: VehicleClass) -> RoadResult<()>;

    fn snapshot(&self) -> SegmentSnapshot;
}

impl Admission for PlainSegment {
    fn id(&self) -> SegmentId {
        PlainSegment::id(self)
    }

    fn try_enter(&self, class: VehicleClass) -> RoadResult<bool> {
        PlainSegment::try_enter(self, class)
    }

    fn enter(&self, class: VehicleClass) -> RoadResult<()> {
        PlainSegment::enter(self, class)
    }

    fn exit(&self, class: VehicleClass) -> RoadResult<()> {
        PlainSegment::exit(self, class)
    }

    fn snapshot(&self) -> SegmentSnapshot {
        PlainSegment::snapshot(self)
    }
}

impl Admission for SharedSegment {
    fn id(&self) -> SegmentId {
        SharedSegment::id(self)
    }

    fn try_enter(&self, class: VehicleClass) -> RoadResult<bool> {
        SharedSegment::try_enter(self, class)
    }

    fn enter(&self, class: VehicleClass) -> RoadResult<()> {
        self.wait_and_enter(class)
    }

    fn exit(&self, class: VehicleClass) -> RoadResult<()> {
        SharedSegment::exit(self, class)
    }

    fn snapshot(&self) -> SegmentSnapshot {
        SharedSegment::snapshot(self)
    }
}

// ── Segment ───────────────────────────────────────────────────────────────────

/// One section of the highway, of either kind.  The kind is fixed by the
/// segment's index when the [`Highway`](crate::Highway) is built.
pub enum Segment {
    Plain(PlainSegment),
    Shared(SharedSegment),
}

impl Segment {
    #[inline]
    pub fn is_shared(&self) -> bool {
        matches!(self, Segment::Shared(_))
    }

    pub fn as_shared(&self) -> Option<&SharedSegment> {
        match self {
            Segment::Shared(s) => Some(s),
            Segment::Plain(_)  => None,
        }
    }

    pub fn capacity(&self) -> u32 {
        match self {
            Segment::Plain(s)  => s.capacity(),
            Segment::Shared(s) => s.capacity(),
        }
    }

    #[inline]
    fn admission(&self) -> &dyn Admission {
        match self {
            Segment::Plain(s)  => s,
            Segment::Shared(s) => s,
        }
    }
}

impl Admission for Segment {
    fn id(&self) -> SegmentId {
        self.admission().id()
    }

    fn try_enter(&self, class: VehicleClass) -> RoadResult<bool> {
        self.admission().try_enter(class)
    }

    fn enter(&self, class: VehicleClass) -> RoadResult<()> {
        self.admission().enter(class)
    }

    fn exit(&self, class: VehicleClass) -> RoadResult<()> {
        self.admission().exit(class)
    }

    fn snapshot(&self) -> SegmentSnapshot {
        self.admission().snapshot()
    }
}
