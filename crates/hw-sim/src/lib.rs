//! `hw-sim`: vehicle tasks and the dispatcher that drives them.
//!
//! # Run lifecycle
//!
//! ```text
//! SimBuilder::build   validate config, build Highway
//! Sim::run
//!   ① Generate : every jittered gap: pick class/direction, spawn a task
//!                 thread; reap finished tasks; stop on quota, wall budget
//!                 or the first task error.
//!   ② Drain    : wait up to the grace period for tasks still on the road;
//!                 join them; count and detach the rest.
//!   ③ Report   : DrainReport, or the first task error.
//! ```
//!
//! Each task walks its route with the [`VehicleTask`] state machine and
//! reports traversals, shoulder waits and arrivals to a [`StatsCollector`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hw_core::HighwayConfig;
//! use hw_sim::{NoopCollector, SimBuilder};
//!
//! let sim = SimBuilder::new(HighwayConfig::default(), Arc::new(NoopCollector)).build()?;
//! let report = sim.run()?;
//! assert!(sim.highway().is_drained() || report.still_running > 0);
//! ```

pub mod builder;
pub mod collector;
pub mod dispatcher;
pub mod error;
pub mod sim;
pub mod task;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use collector::{NoopCollector, StatsCollector};
pub use dispatcher::{Dispatcher, DrainReport, StopReason};
pub use error::{SimError, SimResult};
pub use sim::Sim;
pub use task::{TaskState, Transit, Trip, VehicleTask};
