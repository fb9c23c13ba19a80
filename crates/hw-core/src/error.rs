//! Framework error type.
//!
//! Sub-crates define their own error enums (`RoadError`, `SimError`,
//! `OutputError`) and wrap `HwError` where configuration problems surface.

use thiserror::Error;

/// The top-level error type for `hw-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HwError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `hw-*` crates.
pub type HwResult<T> = Result<T, HwError>;
