//! Deterministic per-vehicle and dispatcher-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each vehicle gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (vehicle_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive vehicle IDs uniformly across the seed space.
//! Vehicle tasks run on their own threads, so the RNG moves into the task and
//! is never shared.
//!
//! Thread interleaving is not deterministic, so two runs with the same seed
//! generate the same vehicles and transit times but not the same waits.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::VehicleId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── VehicleRng ────────────────────────────────────────────────────────────────

/// Per-vehicle deterministic RNG, used for transit times.
pub struct VehicleRng(SmallRng);

impl VehicleRng {
    /// Seed deterministically from the run's global seed and a vehicle ID.
    pub fn new(global_seed: u64, vehicle: VehicleId) -> Self {
        let seed = global_seed ^ (vehicle.0 as u64).wrapping_mul(MIXING_CONSTANT);
        VehicleRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Dispatcher-level RNG: vehicle class, direction and arrival jitter.
///
/// Used only on the dispatcher thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
