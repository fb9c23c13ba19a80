//! `hw-core`: foundational types for the highway admission simulator.
//!
//! This crate is a dependency of every other `hw-*` crate.  It has no `hw-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `VehicleId`, `SegmentId`, `ShoulderId`                |
//! | [`vehicle`]     | `VehicleClass`, `Direction`, `Vehicle`, `Route`       |
//! | [`time`]        | `SimHour`, `HourClock`                                |
//! | [`rng`]         | `VehicleRng` (per-vehicle), `SimRng` (dispatcher)     |
//! | [`config`]      | `HighwayConfig`, `ClassLimits`                        |
//! | [`error`]       | `HwError`, `HwResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to load `HighwayConfig` from a JSON file.         |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ClassLimits, HighwayConfig};
pub use error::{HwError, HwResult};
pub use ids::{SegmentId, ShoulderId, VehicleId};
pub use rng::{SimRng, VehicleRng};
pub use time::{HOURS_PER_DAY, HourClock, SimHour};
pub use vehicle::{Direction, Route, Vehicle, VehicleClass};
