//! Shared utilities for daylimit
//!
//! This crate provides:
//! - The `DayKey` identifier used to index daily usage
//! - Time utilities (local clock with mock support, day keys, HH:MM:SS formatting)
//! - Default paths for the state directory and config file

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
