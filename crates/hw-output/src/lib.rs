//! `hw-output`: traffic statistics and the end-of-run report.
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`stats`]   | `TrafficStats`: the counting `StatsCollector`                |
//! | [`row`]     | `StatsReport` and its row types                               |
//! | [`writer`]  | `OutputWriter` trait                                          |
//! | [`csv`]     | `CsvWriter`: `hourly_arrivals.csv`, `segment_traversals.csv`, `shoulder_waits.csv` |
//! | [`error`]   | `OutputError`, `OutputResult<T>`                              |
//!
//! # Usage
//!
//! ```rust,ignore
//! use hw_output::{CsvWriter, OutputWriter, StatsReport, TrafficStats};
//!
//! let stats = Arc::new(TrafficStats::for_config(&config));
//! let sim = SimBuilder::new(config, Arc::clone(&stats)).build()?;
//! sim.run()?;
//! let report = StatsReport::build(&stats, sim.highway());
//! CsvWriter::new(Path::new("./output"))?.write_report(&report)?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod stats;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{HourlyArrivalRow, SegmentTraversalRow, ShoulderWaitRow, StatsReport};
pub use stats::{TrafficStats, WaitTally};
pub use writer::OutputWriter;
