//! Shoulders: unbounded holding areas between two adjacent segments.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, error};

use hw_core::ShoulderId;

use crate::{RoadError, RoadResult};

/// Occupancy and wait-time statistics for one shoulder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShoulderStats {
    /// Vehicles waiting right now.
    pub waiting:     u32,
    /// High-water mark of `waiting` over the run.
    pub max_waiting: u32,
    /// Sum of all completed waits.
    pub total_wait:  Duration,
    /// Longest completed wait.
    pub max_wait:    Duration,
    /// Vehicles that finished waiting here.
    pub served:      u64,
}

impl ShoulderStats {
    /// Average completed wait, or `None` if nobody has waited yet.
    pub fn mean_wait(&self) -> Option<Duration> {
        if self.served == 0 {
            return None;
        }
        Some(Duration::from_secs_f64(self.total_wait.as_secs_f64() / self.served as f64))
    }
}

/// Proof that a vehicle registered on a shoulder, carrying the time it did.
///
/// The entry timestamp lives with the caller so the shoulder's lock is only
/// held for the counter updates.
#[derive(Debug)]
#[must_use = "a registered waiter must call Shoulder::exit_waiting"]
pub struct ShoulderTicket {
    pub shoulder: ShoulderId,
    pub since:    Instant,
}

impl ShoulderTicket {
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.since.elapsed()
    }
}

/// An unbounded holding area.  Registration never blocks or fails.
pub struct Shoulder {
    id:    ShoulderId,
    stats: Mutex<ShoulderStats>,
}

impl Shoulder {
    pub fn new(id: ShoulderId) -> Self {
        Self {
            id,
            stats: Mutex::new(ShoulderStats::default()),
        }
    }

    #[inline]
    pub fn id(&self) -> ShoulderId {
        self.id
    }

    /// Register one more waiting vehicle.
    pub fn enter_waiting(&self) -> ShoulderTicket {
        let mut stats = self.stats.lock();
        stats.waiting += 1;
        stats.max_waiting = stats.max_waiting.max(stats.waiting);
        debug!(shoulder = %self.id, waiting = stats.waiting, "vehicle pulled over");
        ShoulderTicket {
            shoulder: self.id,
            since:    Instant::now(),
        }
    }

    /// Deregister a waiting vehicle and account its wait.
    pub fn exit_waiting(&self, wait: Duration) -> RoadResult<()> {
        let mut stats = self.stats.lock();
        if stats.waiting == 0 {
            error!(shoulder = %self.id, "deregistration without a waiting vehicle");
            return Err(RoadError::ShoulderUnderflow(self.id));
        }
        stats.waiting -= 1;
        stats.total_wait += wait;
        stats.max_wait = stats.max_wait.max(wait);
        stats.served += 1;
        debug!(shoulder = %self.id, waiting = stats.waiting, ?wait, "vehicle rejoined");
        Ok(())
    }

    pub fn stats(&self) -> ShoulderStats {
        *self.stats.lock()
    }
}
