//! `hw-road`: road resources and the admission protocol.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`segment`]     | `PlainSegment`: admission by free slot                       |
//! | [`shared`]      | `SharedSegment`: class-exclusive admission, per-class waits  |
//! | [`admission`]   | `Admission` trait, `Segment` enum over both kinds             |
//! | [`shoulder`]    | `Shoulder`, `ShoulderTicket`, `ShoulderStats`                 |
//! | [`highway`]     | `Highway`: owns all segments and shoulders of a run          |
//! | [`occupancy`]   | `Occupancy` counters, `SegmentSnapshot`                       |
//! | [`error`]       | `RoadError`, `RoadResult<T>`                                  |
//!
//! # Locking model
//!
//! Every segment and every shoulder has its own `parking_lot::Mutex`.  A
//! blocked vehicle parks on a condition variable tied to the segment it
//! wants, guarded by that segment's lock, and is woken only by an `exit` on
//! the same segment.  No lock is held while waiting on another resource.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on snapshots and stats.    |

pub mod admission;
pub mod error;
pub mod highway;
pub mod occupancy;
pub mod segment;
pub mod shared;
pub mod shoulder;


pub use admission::{Admission, Segment};
pub use error::{RoadError, RoadResult};
pub use highway::Highway;
pub use occupancy::{Occupancy, SegmentSnapshot};
pub use segment::PlainSegment;
pub use shared::SharedSegment;
pub use shoulder::{Shoulder, ShoulderStats, ShoulderTicket};
