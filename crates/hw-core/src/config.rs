//! Top-level simulation configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the simulation builder.  Every field has a
//! default, so a config file only needs the keys it overrides.

use std::time::Duration;

use crate::{HwError, HwResult};

// ── ClassLimits ───────────────────────────────────────────────────────────────

/// How many vehicles of each class the shared segment admits at once.
/// The two classes never co-occupy it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassLimits {
    pub cars:   u32,
    pub trucks: u32,
}

impl Default for ClassLimits {
    fn default() -> Self {
        Self { cars: 2, trucks: 1 }
    }
}

// ── HighwayConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighwayConfig {
    /// Capacity of each segment, in route order (forward direction).
    pub capacities: Vec<u32>,

    /// Index of the segment with class-exclusive admission.
    pub shared_segment: usize,

    /// Class limits applied on the shared segment.
    pub shared_limits: ClassLimits,

    /// Target arrival rate.
    pub vehicles_per_hour: u32,

    /// Simulated hours to generate traffic for.
    pub sim_hours: u32,

    /// Wall seconds that represent one simulated hour.
    pub secs_per_hour: f64,

    /// Uniform jitter applied to each inter-arrival gap, as a fraction of
    /// the mean gap (0.09 → ±9 %).
    pub arrival_jitter: f64,

    /// Probability that a generated vehicle is a truck.
    pub truck_ratio: f64,

    /// Probability that a generated vehicle travels forward.
    pub forward_ratio: f64,

    /// Transit time per segment is `transit_unit_ms * k`, with `k` drawn
    /// uniformly from the inclusive `transit_units` range.
    pub transit_unit_ms: u64,
    pub transit_units:   (u32, u32),

    /// How long to wait for in-flight vehicles once generation stops.
    pub grace_period_secs: f64,

    /// Master RNG seed.  The same seed always generates the same vehicles.
    pub seed: u64,
}

impl Default for HighwayConfig {
    fn default() -> Self {
        Self {
            capacities:        vec![4, 2, 1, 3],
            shared_segment:    1,
            shared_limits:     ClassLimits::default(),
            vehicles_per_hour: 500,
            sim_hours:         24,
            secs_per_hour:     30.0,
            arrival_jitter:    0.09,
            truck_ratio:       0.25,
            forward_ratio:     0.5,
            transit_unit_ms:   40,
            transit_units:     (1, 2),
            grace_period_secs: 20.0,
            seed:              42,
        }
    }
}

impl HighwayConfig {
    /// Reject configurations the admission protocol cannot run with.
    pub fn validate(&self) -> HwResult<()> {
        let fail = |msg: String| Err(HwError::Config(msg));

        if self.capacities.len() < 2 {
            return fail(format!(
                "a highway needs at least 2 segments, got {}",
                self.capacities.len()
            ));
        }
        if let Some(i) = self.capacities.iter().position(|&c| c == 0) {
            return fail(format!("segment {} has zero capacity", i + 1));
        }
        if self.shared_segment >= self.capacities.len() {
            return fail(format!(
                "shared segment index {} out of range (0..{})",
                self.shared_segment,
                self.capacities.len()
            ));
        }
        let limits = self.shared_limits;
        if limits.cars == 0 || limits.trucks == 0 {
            return fail("shared segment class limits must both be positive".into());
        }
        let shared_cap = self.capacities[self.shared_segment];
        if shared_cap < limits.cars.max(limits.trucks) {
            return fail(format!(
                "shared segment capacity {shared_cap} is below its class limits ({} cars / {} trucks)",
                limits.cars, limits.trucks
            ));
        }
        for (name, p) in [
            ("truck_ratio", self.truck_ratio),
            ("forward_ratio", self.forward_ratio),
            ("arrival_jitter", self.arrival_jitter),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return fail(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if !(self.secs_per_hour > 0.0) || Duration::try_from_secs_f64(self.secs_per_hour).is_err() {
            return fail(format!(
                "secs_per_hour must be positive and finite, got {}",
                self.secs_per_hour
            ));
        }
        let budget_secs = self.secs_per_hour * self.sim_hours as f64;
        if Duration::try_from_secs_f64(budget_secs).is_err() {
            return fail(format!(
                "wall budget of {budget_secs} s ({} h at {} s/h) is out of range",
                self.sim_hours, self.secs_per_hour
            ));
        }
        if Duration::try_from_secs_f64(self.grace_period_secs).is_err() {
            return fail(format!(
                "grace_period_secs must be finite and not negative, got {}",
                self.grace_period_secs
            ));
        }
        if self.transit_units.0 > self.transit_units.1 {
            return fail(format!(
                "transit_units range is inverted: {:?}",
                self.transit_units
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.capacities.len()
    }

    /// One shoulder per adjacent segment pair.
    #[inline]
    pub fn shoulder_count(&self) -> usize {
        self.capacities.len().saturating_sub(1)
    }

    /// How many vehicles the dispatcher generates if the wall budget allows.
    pub fn total_vehicles(&self) -> u64 {
        self.vehicles_per_hour as u64 * self.sim_hours as u64
    }

    /// Wall-clock cutoff for vehicle generation.
    pub fn wall_budget(&self) -> Duration {
        Duration::from_secs_f64(self.secs_per_hour * self.sim_hours as f64)
    }

    /// Mean gap between two arrivals; zero when the rate is zero.
    pub fn mean_interarrival(&self) -> Duration {
        if self.vehicles_per_hour == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.secs_per_hour / self.vehicles_per_hour as f64)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs_f64(self.grace_period_secs)
    }

    pub fn transit_unit(&self) -> Duration {
        Duration::from_millis(self.transit_unit_ms)
    }
}
