//! `Highway`: the composition root that owns every segment and shoulder.

use hw_core::{ClassLimits, HighwayConfig, SegmentId, ShoulderId};

use crate::admission::{Admission, Segment};
use crate::occupancy::SegmentSnapshot;
use crate::shoulder::{Shoulder, ShoulderStats};
use crate::{PlainSegment, RoadError, RoadResult, SharedSegment};

/// All road resources of one run.
///
/// Built once at startup and shared by reference (typically behind an
/// `Arc`) with every vehicle task.  Segment `i` and shoulder `i` are stored
/// at index `i`; shoulder `i` sits between segments `i` and `i + 1`.
pub struct Highway {
    segments:  Vec<Segment>,
    shoulders: Vec<Shoulder>,
}

impl Highway {
    /// Build a highway from the segment/shared-segment part of `config`.
    pub fn from_config(config: &HighwayConfig) -> RoadResult<Self> {
        config.validate()?;
        Ok(Self::build(
            &config.capacities,
            config.shared_segment,
            config.shared_limits,
        ))
    }

    /// Build a highway from explicit capacities, validating them with the
    /// default run parameters.
    pub fn new(capacities: &[u32], shared_segment: usize, limits: ClassLimits) -> RoadResult<Self> {
        let config = HighwayConfig {
            capacities:     capacities.to_vec(),
            shared_segment,
            shared_limits:  limits,
            ..HighwayConfig::default()
        };
        Self::from_config(&config)
    }

    fn build(capacities: &[u32], shared_segment: usize, limits: ClassLimits) -> Self {
        let segments = capacities
            .iter()
            .enumerate()
            .map(|(i, &capacity)| {
                let id = SegmentId(i as u32);
                if i == shared_segment {
                    Segment::Shared(SharedSegment::new(id, capacity, limits))
                } else {
                    Segment::Plain(PlainSegment::new(id, capacity))
                }
            })
            .collect::<Vec<_>>();

        let shoulders = (0..segments.len().saturating_sub(1))
            .map(|i| Shoulder::new(ShoulderId(i as u32)))
            .collect();

        Self { segments, shoulders }
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn shoulder_count(&self) -> usize {
        self.shoulders.len()
    }

    pub fn segment(&self, id: SegmentId) -> RoadResult<&Segment> {
        self.segments
            .get(id.index())
            .ok_or(RoadError::UnknownSegment(id))
    }

    pub fn shoulder(&self, id: ShoulderId) -> RoadResult<&Shoulder> {
        self.shoulders
            .get(id.index())
            .ok_or(RoadError::UnknownShoulder(id))
    }

    /// The shoulder a vehicle waits on when moving from `from` to `to`.
    pub fn shoulder_between(&self, from: SegmentId, to: SegmentId) -> RoadResult<&Shoulder> {
        let id = ShoulderId::between(from, to).ok_or(RoadError::NotAdjacent { from, to })?;
        self.shoulder(id)
    }

    /// The class-exclusive segment, if this highway has one.
    pub fn shared_segment(&self) -> Option<&SharedSegment> {
        self.segments.iter().find_map(Segment::as_shared)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn shoulders(&self) -> impl Iterator<Item = &Shoulder> {
        self.shoulders.iter()
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// One snapshot per segment, each taken under that segment's lock.
    pub fn snapshots(&self) -> Vec<SegmentSnapshot> {
        self.segments.iter().map(Admission::snapshot).collect()
    }

    pub fn shoulder_stats(&self) -> Vec<ShoulderStats> {
        self.shoulders.iter().map(Shoulder::stats).collect()
    }

    /// `true` once no vehicle holds or waits for any segment and every
    /// entry has a matching exit.
    pub fn is_drained(&self) -> bool {
        self.snapshots()
            .iter()
            .all(|s| s.is_drained() && s.waiting == 0)
    }
}
