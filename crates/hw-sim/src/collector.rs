//! Statistics hooks invoked by vehicle tasks.

use std::time::Duration;

use hw_core::{Direction, SegmentId, ShoulderId, SimHour};

/// Increment hooks called from vehicle tasks as they travel.
///
/// Implementations are shared by every vehicle thread, so all methods take
/// `&self` and must only hold their own lock for the duration of a counter
/// update.  All methods have default no-op implementations so implementors
/// only need to override what they care about.
///
/// # Example
///
/// ```rust,ignore
/// struct Arrivals(AtomicU64);
///
/// impl StatsCollector for Arrivals {
///     fn record_hourly_arrival(&self, _dir: Direction, _hour: SimHour) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
/// ```
pub trait StatsCollector: Send + Sync + 'static {
    /// A vehicle was admitted to `segment` travelling in `direction`.
    fn record_segment_traversal(&self, _segment: SegmentId, _direction: Direction) {}

    /// A vehicle finished waiting on `shoulder` after `wait`.
    fn record_shoulder_wait(&self, _shoulder: ShoulderId, _wait: Duration) {}

    /// A vehicle joined the highway during simulated hour `hour`.
    fn record_hourly_arrival(&self, _direction: Direction, _hour: SimHour) {}
}

/// A [`StatsCollector`] that discards everything.
pub struct NoopCollector;

impl StatsCollector for NoopCollector {}
