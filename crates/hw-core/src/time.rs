//! Wall-clock to simulated-hour mapping.
//!
//! # Design
//!
//! The simulation runs in compressed real time: one simulated hour lasts
//! `secs_per_hour` wall seconds.  The hour of day a vehicle arrives in is
//!
//!   hour = floor(elapsed_secs / secs_per_hour) mod 24
//!
//! so a run longer than one simulated day folds back onto the same 24
//! reporting buckets.

use std::fmt;
use std::time::{Duration, Instant};

/// Number of hourly reporting buckets.
pub const HOURS_PER_DAY: usize = 24;

// ── SimHour ───────────────────────────────────────────────────────────────────

/// An hour of the simulated day, in `0..24`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimHour(pub u8);

impl SimHour {
    /// Bucket index for per-hour counter arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SimHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

// ── HourClock ─────────────────────────────────────────────────────────────────

/// Maps elapsed wall time since the start of the run onto simulated hours.
///
/// `HourClock` is `Copy`; every vehicle task may hold its own.
#[derive(Copy, Clone, Debug)]
pub struct HourClock {
    started:       Instant,
    secs_per_hour: f64,
}

impl HourClock {
    /// Start a clock now.  `secs_per_hour` must be positive; validated by
    /// [`HighwayConfig::validate`](crate::HighwayConfig::validate).
    pub fn start(secs_per_hour: f64) -> Self {
        Self::starting_at(Instant::now(), secs_per_hour)
    }

    pub fn starting_at(started: Instant, secs_per_hour: f64) -> Self {
        Self { started, secs_per_hour }
    }

    #[inline]
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Wall time since the clock started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole simulated hours elapsed after `elapsed` wall time (not folded).
    pub fn hours_after(&self, elapsed: Duration) -> u64 {
        (elapsed.as_secs_f64() / self.secs_per_hour) as u64
    }

    /// The simulated hour of day after `elapsed` wall time.
    pub fn hour_after(&self, elapsed: Duration) -> SimHour {
        SimHour((self.hours_after(elapsed) % HOURS_PER_DAY as u64) as u8)
    }

    /// The simulated hour of day right now.
    pub fn current_hour(&self) -> SimHour {
        self.hour_after(self.elapsed())
    }

    /// Wall time spanned by `hours` simulated hours.
    pub fn wall_time_for_hours(&self, hours: u32) -> Duration {
        Duration::from_secs_f64(self.secs_per_hour * hours as f64)
    }
}
